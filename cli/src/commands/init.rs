//! Init command - writes a starter `schemakit.toml`

use std::path::Path;

use crate::config::{CONFIG_FILE, Dialect};
use crate::error::CliError;
use crate::output;

pub fn run(dialect: Dialect, path: &Path) -> Result<(), CliError> {
    if path.exists() {
        return Err(CliError::Other(format!(
            "{} already exists. Delete it first to reinitialize.",
            path.display()
        )));
    }

    std::fs::write(path, template(dialect)).map_err(|e| CliError::IoError(e.to_string()))?;

    println!("{}", output::success(&format!("Created {}", path.display())));
    println!();
    println!("Next steps:");
    println!("  1. Edit {} with your database credentials", CONFIG_FILE);
    println!(
        "  2. Run {} to capture the live schema",
        output::heading("schemakit introspect")
    );
    Ok(())
}

/// Starter configuration for `dialect`
pub fn template(dialect: Dialect) -> String {
    let credentials = match dialect {
        Dialect::SQLite => "url = \"./dev.db\"\n".to_string(),
        Dialect::PostgreSQL => server_credentials("postgres", 5432, "postgres"),
        Dialect::MySQL => server_credentials("mysql", 3306, "root"),
    };

    format!(
        r#"# schemakit configuration

dialect = "{dialect}"
out = "./schemakit"
package = "models"
# models = "models/models.go"

[dbCredentials]
{credentials}"#,
        dialect = dialect.as_str(),
    )
}

fn server_credentials(scheme: &str, port: u16, user: &str) -> String {
    format!(
        r#"url = "{scheme}://{user}:password@localhost:{port}/mydb"
# or read it from the environment:
# url = {{ env = "DATABASE_URL" }}

# Or use individual connection fields:
# [dbCredentials]
# host = "localhost"
# port = {port}
# user = "{user}"
# password = "password"
# database = "mydb"
"#
    )
}
