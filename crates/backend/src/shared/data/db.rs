use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const CREATE_FALLA_TABLE: &str = r#"
    CREATE TABLE a001_falla (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        equipo_tipo TEXT NOT NULL,
        equipo_id INTEGER NOT NULL,
        tipo_falla_id INTEGER,
        descripcion TEXT,
        prioridad TEXT,
        fecha_reporte TEXT NOT NULL,
        estado TEXT NOT NULL DEFAULT 'Pendiente',
        fecha_cierre TEXT,
        solucion_aplicada TEXT,
        observaciones TEXT
    );
"#;

const CREATE_FALLA_EQUIPO_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_a001_falla_equipo
    ON a001_falla (equipo_tipo, equipo_id, estado);
"#;

const CREATE_EQUIPO_TABLE: &str = r#"
    CREATE TABLE a002_equipo (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tipo TEXT NOT NULL,
        codigo TEXT NOT NULL,
        nombre TEXT,
        activo INTEGER NOT NULL DEFAULT 1
    );
"#;

const CREATE_SYSTEM_LOG_TABLE: &str = r#"
    CREATE TABLE system_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        source TEXT NOT NULL,
        category TEXT NOT NULL,
        message TEXT NOT NULL
    );
"#;

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    tracing::info!("Connecting to database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    ensure_table(&conn, "a001_falla", CREATE_FALLA_TABLE).await?;
    execute(&conn, CREATE_FALLA_EQUIPO_INDEX).await?;
    ensure_table(&conn, "a002_equipo", CREATE_EQUIPO_TABLE).await?;
    ensure_table(&conn, "system_log", CREATE_SYSTEM_LOG_TABLE).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

/// Создать таблицу, если её ещё нет в sqlite_master
async fn ensure_table(conn: &DatabaseConnection, name: &str, create_sql: &str) -> anyhow::Result<()> {
    let check_sql = format!(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
        name
    );
    let existing = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, check_sql))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", name);
        execute(conn, create_sql).await?;
    }
    Ok(())
}

async fn execute(conn: &DatabaseConnection, sql: &str) -> anyhow::Result<()> {
    conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
        .await?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
