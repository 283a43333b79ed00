//! Process-wide provider with `MONGO_URI` unset. Kept in its own test binary
//! because `APP_CONFIG` is evaluated once per process.

use mongo_provider::database;
use mongo_provider::errors::{ConfigError, Error};

#[test]
fn test_provider_keeps_failing_without_mongo_uri() {
    temp_env::with_var_unset("MONGO_URI", || {
        for _ in 0..3 {
            assert!(matches!(
                database::provider(),
                Err(Error::Config(ConfigError::MissingUri))
            ));
        }

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let err = runtime.block_on(database::connection()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingUri)));
        assert!(err.to_string().contains("Mongo URI"));
    });
}
