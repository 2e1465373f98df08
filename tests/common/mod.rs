use pgenum::codec::{ColumnCodec, EnumColumnCodec, RawValue};
use pgenum::config::{CONFIG, Config};
use pgenum::metadata::{EnumDescriptor, EnumMetadata, EnumTriggers};
use pgenum::{EnumRegistry, NativeTypeName, SqliteCatalog};
use rusqlite::{Connection, OptionalExtension, params};

pgenum::pg_enum! {
    #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
    pub enum PostStatus {
        PENDING,
        APPROVED,
        SPAM,
    }
}

pub const POST_STATUS_TYPE: &str = "post_status_info";

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(CONFIG.log_level.clone())
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub status: Option<PostStatus>,
}

/// Projection holding only the status column
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct PostDto {
    pub status: Option<PostStatus>,
}

/// Minimal data-access layer over the SQLite enum emulation, calling the codec
/// the way a mapping runtime would.
#[allow(dead_code)]
pub struct PostStore {
    pub catalog: SqliteCatalog,
    pub registry: EnumRegistry,
    pub codec: EnumColumnCodec<PostStatus>,
}

#[allow(dead_code)]
impl PostStore {
    /// In-memory store with the enum type and `post` table bootstrapped
    pub async fn setup() -> pgenum::Result<Self> {
        Self::open(Connection::open_in_memory()?, Config::default()).await
    }

    pub async fn open(mut conn: Connection, config: Config) -> pgenum::Result<Self> {
        let type_name = NativeTypeName::parse(POST_STATUS_TYPE)?;
        let descriptor = EnumDescriptor::for_enum::<PostStatus>(type_name.clone())?;

        EnumMetadata::bootstrap(&mut conn, &descriptor)?;
        conn.execute_batch(
            "DROP TABLE IF EXISTS post;
             CREATE TABLE post (
                 id INTEGER PRIMARY KEY,
                 title TEXT,
                 status TEXT
             );",
        )?;
        EnumTriggers::bind_column(&conn, "post", "status", &type_name)?;

        Self::attach(conn, config).await
    }

    /// Register the family against an already-initialized database
    pub async fn attach(conn: Connection, config: Config) -> pgenum::Result<Self> {
        let catalog = SqliteCatalog::new(conn)?;
        let registry = EnumRegistry::with_config(&config);
        registry
            .register_verified::<PostStatus, _>(&catalog, POST_STATUS_TYPE)
            .await?;
        let codec = EnumColumnCodec::new(&registry)?;

        Ok(PostStore {
            catalog,
            registry,
            codec,
        })
    }

    pub fn persist(&self, post: &Post) -> pgenum::Result<()> {
        let status = self.codec.encode(post.status.as_ref())?;
        self.catalog.with_connection(|conn| {
            conn.execute(
                "INSERT INTO post (id, title, status) VALUES (?1, ?2, ?3)",
                params![post.id, post.title, status],
            )?;
            Ok(())
        })
    }

    /// Insert a row with a literal label, bypassing the codec
    pub fn insert_raw(&self, id: i64, title: &str, label: &str) -> pgenum::Result<()> {
        self.catalog.with_connection(|conn| {
            conn.execute(
                "INSERT INTO post (id, title, status) VALUES (?1, ?2, ?3)",
                params![id, title, label],
            )?;
            Ok(())
        })
    }

    pub fn find(&self, id: i64) -> pgenum::Result<Option<Post>> {
        let row = self.catalog.with_connection(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, title, status FROM post WHERE id = ?1",
                    [id],
                    |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, RawValue>(2)?)),
                )
                .optional()?;
            Ok(row)
        })?;

        match row {
            Some((id, title, raw)) => Ok(Some(Post {
                id,
                title,
                status: self.codec.decode(&raw)?,
            })),
            None => Ok(None),
        }
    }

    pub fn find_by_status(&self, status: PostStatus) -> pgenum::Result<Vec<Post>> {
        let param = self.codec.encode(Some(&status))?;
        let rows = self.catalog.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT id, title, status FROM post WHERE status = ?1 ORDER BY id")?;
            let rows = stmt
                .query_map([&param], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, RawValue>(2)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        rows.into_iter()
            .map(|(id, title, raw)| {
                Ok(Post {
                    id,
                    title,
                    status: self.codec.decode(&raw)?,
                })
            })
            .collect()
    }

    pub fn project_statuses(&self) -> pgenum::Result<Vec<PostDto>> {
        let raws = self.catalog.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT status FROM post ORDER BY id")?;
            let raws = stmt
                .query_map([], |row| row.get::<_, RawValue>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(raws)
        })?;

        raws.iter()
            .map(|raw| Ok(PostDto { status: self.codec.decode(raw)? }))
            .collect()
    }
}
