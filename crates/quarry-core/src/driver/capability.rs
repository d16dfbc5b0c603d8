use crate::schema::db;

/// SQL dialect spoken by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Sqlite,
    Postgresql,
    Mysql,
    Mssql,
}

/// How an insert reports the identity generated for an auto-increment
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityReturn {
    /// `INSERT ... RETURNING id`
    Returning,

    /// `INSERT ... OUTPUT INSERTED.id VALUES ...`
    OutputInserted,

    /// A follow-up `SELECT LAST_INSERT_ID()` on the same connection.
    LastInsertId,
}

#[derive(Debug)]
pub struct Capability {
    pub flavor: Flavor,

    /// Column storage types supported by the database
    pub storage_types: StorageTypes,

    pub identity_return: IdentityReturn,

    /// Stored procedures can be called by name.
    pub stored_procedures: bool,

    /// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY` is supported. When
    /// false, foreign keys are only created along with their table.
    pub add_foreign_key: bool,

    /// `ALTER TABLE ... DROP COLUMN` is supported.
    pub drop_column: bool,
}

#[derive(Debug)]
pub struct StorageTypes {
    /// The default storage type for a string.
    pub default_string_type: db::Type,

    /// When `Some` the database supports varchar types with the specified upper
    /// limit.
    pub varchar: Option<u64>,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        flavor: Flavor::Sqlite,
        storage_types: StorageTypes::SQLITE,
        identity_return: IdentityReturn::Returning,
        stored_procedures: false,
        add_foreign_key: false,
        drop_column: true,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        flavor: Flavor::Postgresql,
        storage_types: StorageTypes::POSTGRESQL,
        stored_procedures: true,
        add_foreign_key: true,
        ..Self::SQLITE
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        flavor: Flavor::Mysql,
        storage_types: StorageTypes::MYSQL,
        identity_return: IdentityReturn::LastInsertId,
        ..Self::POSTGRESQL
    };

    /// SQL Server capabilities
    pub const MSSQL: Self = Self {
        flavor: Flavor::Mssql,
        storage_types: StorageTypes::MSSQL,
        identity_return: IdentityReturn::OutputInserted,
        ..Self::POSTGRESQL
    };
}

impl StorageTypes {
    /// SQLite storage types
    pub const SQLITE: StorageTypes = StorageTypes {
        default_string_type: db::Type::Text,

        // SQLite ignores the length of VARCHAR(N); the only limit is
        // SQLITE_MAX_LENGTH, one billion by default.
        varchar: Some(1_000_000_000),
    };

    pub const POSTGRESQL: StorageTypes = StorageTypes {
        default_string_type: db::Type::Text,

        // Larger typmods are rejected at table creation time.
        varchar: Some(10_485_760),
    };

    pub const MYSQL: StorageTypes = StorageTypes {
        // 191 characters keeps utf8mb4 columns indexable on older InnoDB
        // row formats.
        default_string_type: db::Type::VarChar(191),

        varchar: Some(65_535),
    };

    pub const MSSQL: StorageTypes = StorageTypes {
        default_string_type: db::Type::VarChar(255),

        // NVARCHAR(n) allows up to 4000; longer strings use NVARCHAR(MAX).
        varchar: Some(4_000),
    };
}
