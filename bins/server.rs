use std::process::ExitCode;

use configs::AppConfig;
use tracing::{error, info};
use uuid::Uuid;

/// Multi-thread runtime sized by `server.worker_threads`.
fn build_runtime(cfg: &AppConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    builder.build()
}

fn main() -> ExitCode {
    // .env must be loaded before the subscriber reads RUST_LOG / LOG_FORMAT
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging();

    let instance_id = Uuid::new_v4();
    let pid = std::process::id();

    std::panic::set_hook(Box::new(move |info| {
        error!(event = "panic", %instance_id, pid, message = %info, "unhandled panic");
    }));

    let cfg = match server::startup::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(event = "config_invalid", error = %e, "refusing to start with a broken configuration");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(&cfg) {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        event = "start",
        %instance_id,
        pid,
        version = env!("CARGO_PKG_VERSION"),
        addr = %cfg.server.bind_addr(),
        base_dir = %cfg.storage.base_dir,
        lock_scope = ?cfg.storage.lock_scope,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "gardi starting"
    );

    rt.block_on(async move {
        tokio::select! {
            res = server::run(cfg) => match res {
                Ok(()) => {
                    info!(event = "stop", %instance_id, "server stopped");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(event = "run_failed", error = %e, "server exited with an error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(event = "shutdown_signal", %instance_id, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
