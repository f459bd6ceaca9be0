pub mod types;
pub mod utils;
pub mod env;

/// Collection holding user schemas.
pub const COLLECTION_SCHEMAS: &str = "schemas";
/// Collection holding schema instances.
pub const COLLECTION_INSTANCES: &str = "instances";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn collections_are_distinct() {
        assert_ne!(COLLECTION_SCHEMAS, COLLECTION_INSTANCES);
    }
}
