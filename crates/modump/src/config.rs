//! Dump options and validation.

use tracing::warn;

use crate::error::{DumpError, Result};

/// Default byte budget for one emitted `INSERT` statement. Approximates the
/// transport packet size of the consuming client.
pub const DEFAULT_NET_BUFFER_LENGTH: usize = 1_048_576;

/// Lower clamp bound for the statement byte budget.
pub const MIN_NET_BUFFER_LENGTH: usize = 16_384;

/// Upper clamp bound for the statement byte budget.
pub const MAX_NET_BUFFER_LENGTH: usize = 16_777_216;

/// Options consumed by the dump engine.
///
/// Credentials and endpoint are opaque to the core; they are only assembled
/// into a connection handle by [`crate::driver::connect`].
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Username.
    pub user: String,
    /// Password.
    pub password: String,
    /// Database host. Must not contain `:`.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Target database name(s), comma-separated, or the literal `all`.
    pub database: String,
    /// Optional table subset. Empty means all tables.
    pub tables: Vec<String>,
    /// Byte budget per output statement, clamped to
    /// [`MIN_NET_BUFFER_LENGTH`, `MAX_NET_BUFFER_LENGTH`].
    pub net_buffer_length: usize,
    /// Export data as CSV side files instead of INSERT statements.
    pub to_csv: bool,
    /// CSV field delimiter, exactly one character.
    pub csv_field_delimiter: char,
    /// Apply the escape character set to CSV string fields.
    pub enable_escape: bool,
    /// Emit `LOAD DATA LOCAL INFILE` instead of `LOAD DATA INFILE`.
    pub local_infile: bool,
    /// Dump definitions only, without data.
    pub no_data: bool,
    /// Raw WHERE clause restricting exported rows.
    pub where_clause: Option<String>,
    /// Restrict catalog queries to the system account.
    pub sys_account: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            password: "111".to_string(),
            host: "127.0.0.1".to_string(),
            port: 6001,
            database: String::new(),
            tables: Vec::new(),
            net_buffer_length: DEFAULT_NET_BUFFER_LENGTH,
            to_csv: false,
            csv_field_delimiter: ',',
            enable_escape: false,
            local_infile: true,
            no_data: false,
            where_clause: None,
            sys_account: false,
        }
    }
}

impl DumpOptions {
    /// Split the database option into trimmed, non-empty names.
    ///
    /// An unspecified database is an error; the literal `all` is resolved
    /// against the live catalog by the orchestrator, not here.
    pub fn databases(&self) -> Result<Vec<String>> {
        if self.database.is_empty() {
            return Err(DumpError::invalid_input("database must be specified"));
        }
        Ok(self
            .database
            .split(',')
            .map(str::trim)
            .filter(|db| !db.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Username with the DSN separator `:` replaced by `#`.
    ///
    /// `:` separates fields in the connection string, so it cannot appear in
    /// the username (the password may contain it).
    pub fn sanitized_user(&self) -> String {
        self.user.replace(':', "#")
    }

    /// Validate the endpoint fields.
    pub fn validate(&self) -> Result<()> {
        if self.host.contains(':') {
            return Err(DumpError::invalid_input("host can not have character ':'"));
        }
        Ok(())
    }

    /// Clamp the statement byte budget into its allowed range.
    pub fn clamp_net_buffer_length(&mut self) {
        if self.net_buffer_length < MIN_NET_BUFFER_LENGTH {
            warn!(
                "net_buffer_length must be greater than {}, set to {}",
                MIN_NET_BUFFER_LENGTH, MIN_NET_BUFFER_LENGTH
            );
            self.net_buffer_length = MIN_NET_BUFFER_LENGTH;
        }
        if self.net_buffer_length > MAX_NET_BUFFER_LENGTH {
            warn!(
                "net_buffer_length must be less than {}, set to {}",
                MAX_NET_BUFFER_LENGTH, MAX_NET_BUFFER_LENGTH
            );
            self.net_buffer_length = MAX_NET_BUFFER_LENGTH;
        }
    }
}

/// Parse the CSV field delimiter option.
///
/// Exactly one character is allowed. The CSV writer works on bytes, so the
/// character must also be single-byte.
pub fn parse_field_delimiter(s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            if !c.is_ascii() {
                return Err(DumpError::invalid_input(
                    "csv field delimiter must be a single-byte character",
                ));
            }
            Ok(c)
        }
        (Some(_), Some(_)) => Err(DumpError::invalid_input(
            "there are multiple utf8 characters for csv field delimiter. only one utf8 character is allowed",
        )),
        (None, _) => Err(DumpError::invalid_input(
            "csv field delimiter is invalid utf8 character",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_databases_unspecified() {
        let opts = DumpOptions::default();
        assert!(matches!(
            opts.databases(),
            Err(DumpError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_databases_split_and_trim() {
        let mut opts = DumpOptions::default();
        opts.database = "db1, db2 ,,db3".to_string();
        assert_eq!(opts.databases().unwrap(), vec!["db1", "db2", "db3"]);
    }

    #[test]
    fn test_host_with_colon_rejected() {
        let mut opts = DumpOptions::default();
        opts.host = "127.0.0.1:6001".to_string();
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_username_colon_replaced() {
        let mut opts = DumpOptions::default();
        opts.user = "acct:user".to_string();
        assert_eq!(opts.sanitized_user(), "acct#user");
    }

    #[test]
    fn test_net_buffer_clamped() {
        let mut opts = DumpOptions::default();
        opts.net_buffer_length = 1;
        opts.clamp_net_buffer_length();
        assert_eq!(opts.net_buffer_length, MIN_NET_BUFFER_LENGTH);

        opts.net_buffer_length = usize::MAX;
        opts.clamp_net_buffer_length();
        assert_eq!(opts.net_buffer_length, MAX_NET_BUFFER_LENGTH);
    }

    #[test]
    fn test_parse_field_delimiter() {
        assert_eq!(parse_field_delimiter(";").unwrap(), ';');
        assert!(parse_field_delimiter("").is_err());
        assert!(parse_field_delimiter(";;").is_err());
        assert!(parse_field_delimiter("Á").is_err());
    }
}
