use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::PgConnectOptions;
use sqlx::sqlite::SqliteConnectOptions;

/// Host every environment's database lives on.
pub const DATABASE_HOST: &str = "localhost";
const DEFAULT_CREDENTIAL: &str = "postgres";

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Deserialize, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    Postgres,
    Sqlite,
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings {
    pub engine: DatabaseEngine,
    pub username: String,
    pub password: SecretString,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub database_name: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn postgres_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .database(&self.database_name)
    }

    // sqlite keeps the whole database in a file named after the database
    pub fn sqlite_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(format!("{}.db", self.database_name))
            .create_if_missing(true)
    }
}

/// Deployment environment, picked with `APP_ENVIRONMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Application,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Application => "application",
            Environment::Test => "test",
        }
    }

    pub fn database_name(&self) -> &'static str {
        match self {
            Environment::Application => "trivia",
            Environment::Test => "trivia_test",
        }
    }

    /// Names of the variables holding the database user and password.
    pub fn credential_vars(&self) -> (&'static str, &'static str) {
        match self {
            Environment::Application => ("DB_USER", "DB_PASSWORD"),
            Environment::Test => ("TEST_DB_USER", "TEST_DB_PASSWORD"),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "application" => Ok(Environment::Application),
            "test" => Ok(Environment::Test),
            other => Err(format!(
                "{other} is not a supported environment, use either `application` or `test`"
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| Environment::Application.as_str().to_owned())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let (user_var, password_var) = environment.credential_vars();
    let username = std::env::var(user_var).unwrap_or_else(|_| DEFAULT_CREDENTIAL.to_owned());
    let password = std::env::var(password_var).unwrap_or_else(|_| DEFAULT_CREDENTIAL.to_owned());

    load(environment, username, password)
}

fn load(
    environment: Environment,
    username: String,
    password: String,
) -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 8080_i64)?
        .set_default("database.engine", "postgres")?
        .set_default("database.host", DATABASE_HOST)?
        .set_default("database.port", 5432_i64)?
        .set_default("database.database_name", environment.database_name())?
        .set_default("database.max_connections", 5_i64)?
        .set_default("database.username", username)?
        .set_default("database.password", password)?
        .add_source(config::File::with_name("configuration/base").required(false))
        // e.g. APP_APPLICATION__PORT=5001 sets application.port
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
