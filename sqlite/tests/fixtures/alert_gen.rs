// Code generated by "txkit-gen --type Alert schemas"; DO NOT EDIT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alert {
    pub id: i64,
    pub title: ::std::string::String,
    pub active: bool,
    pub created_at: ::txkit_sqlite::chrono::DateTime<::txkit_sqlite::chrono::Utc>,
    pub updated_at: ::std::option::Option<::txkit_sqlite::chrono::DateTime<::txkit_sqlite::chrono::Utc>>,
}
pub const ALERT_ID: &str = "`alerts`.`id`";
pub const ALERT_TITLE: &str = "`alerts`.`title`";
pub const ALERT_ACTIVE: &str = "`alerts`.`active`";
pub const ALERT_CREATED_AT: &str = "`alerts`.`created_at`";
pub const ALERT_UPDATED_AT: &str = "`alerts`.`updated_at`";
pub const QUERY_ALERT_SELECT: ::txkit_sqlite::Query = ::txkit_sqlite::Query::from_static("SELECT `id`, `title`, `active`, `created_at`, `updated_at` FROM alerts");
pub const QUERY_ALERT_UPDATE: ::txkit_sqlite::Query = ::txkit_sqlite::Query::from_static("UPDATE alerts SET `title`=:title, `active`=:active, `created_at`=:created_at, `updated_at`=:updated_at WHERE `id`=:id");
pub const QUERY_ALERT_INSERT: ::txkit_sqlite::Query = ::txkit_sqlite::Query::from_static("INSERT INTO alerts (`id`, `title`, `active`, `created_at`, `updated_at`) VALUES (:id, :title, :active, :created_at, :updated_at)");
pub const QUERY_ALERT_INSERT_OR_UPDATE: ::txkit_sqlite::Query = ::txkit_sqlite::Query::from_static("INSERT INTO alerts (`id`, `title`, `active`, `created_at`, `updated_at`) VALUES (:id, :title, :active, :created_at, :updated_at) ON CONFLICT(`id`) DO UPDATE SET `title`=excluded.`title`, `active`=excluded.`active`, `updated_at`=excluded.`updated_at`");
pub const QUERY_ALERT_DELETE: ::txkit_sqlite::Query = ::txkit_sqlite::Query::from_static("UPDATE alerts SET `active` = 0 WHERE `id`=:id");
impl ::txkit_sqlite::FromRow for Alert {
    fn from_row(row: &::txkit_sqlite::rusqlite::Row<'_>) -> ::txkit_sqlite::rusqlite::Result<Self> {
        ::std::result::Result::Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            active: row.get("active")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
impl ::txkit_sqlite::Getter for Alert {
    fn get(&mut self, tx: &mut ::txkit_sqlite::Tx<'_>, qx: &::txkit_sqlite::Queryx) -> ::txkit_sqlite::Result<()> {
        *self = tx.query_row(qx)?;
        ::std::result::Result::Ok(())
    }
}
impl ::txkit_sqlite::Updater for Alert {
    fn update(&mut self, tx: &mut ::txkit_sqlite::Tx<'_>) -> ::txkit_sqlite::Result<()> {
        let now = ::txkit_sqlite::chrono::Utc::now();
        self.updated_at = ::std::option::Option::Some(now);
        tx.exec_named(&QUERY_ALERT_UPDATE, ::txkit_sqlite::rusqlite::named_params! { ":id": self.id, ":title": self.title, ":active": self.active, ":created_at": self.created_at, ":updated_at": self.updated_at })?;
        ::std::result::Result::Ok(())
    }
}
impl ::txkit_sqlite::InsertOrUpdater for Alert {
    fn insert_or_update(&mut self, tx: &mut ::txkit_sqlite::Tx<'_>) -> ::txkit_sqlite::Result<()> {
        let now = ::txkit_sqlite::chrono::Utc::now();
        self.created_at = now;
        self.updated_at = ::std::option::Option::Some(now);
        tx.exec_named(&QUERY_ALERT_INSERT_OR_UPDATE, ::txkit_sqlite::rusqlite::named_params! { ":id": self.id, ":title": self.title, ":active": self.active, ":created_at": self.created_at, ":updated_at": self.updated_at })?;
        ::std::result::Result::Ok(())
    }
}
impl ::txkit_sqlite::Inserter for Alert {
    fn insert(&mut self, tx: &mut ::txkit_sqlite::Tx<'_>) -> ::txkit_sqlite::Result<()> {
        let now = ::txkit_sqlite::chrono::Utc::now();
        self.created_at = now;
        self.updated_at = ::std::option::Option::Some(now);
        tx.exec_named(&QUERY_ALERT_INSERT, ::txkit_sqlite::rusqlite::named_params! { ":id": self.id, ":title": self.title, ":active": self.active, ":created_at": self.created_at, ":updated_at": self.updated_at })?;
        ::std::result::Result::Ok(())
    }
}
impl ::txkit_sqlite::Deleter for Alert {
    fn delete(&self, tx: &mut ::txkit_sqlite::Tx<'_>) -> ::txkit_sqlite::Result<()> {
        tx.exec_named(&QUERY_ALERT_DELETE, ::txkit_sqlite::rusqlite::named_params! { ":id": self.id })?;
        ::std::result::Result::Ok(())
    }
}
pub fn register_alert(registry: &mut ::txkit_sqlite::Registry) {
    registry.register(::txkit_sqlite::Handlers::<Alert>::crud());
}
pub fn query_alerts() -> ::txkit_sqlite::SelectQuery {
    ::txkit_sqlite::SelectQuery::new("alerts").fields([ALERT_ID, ALERT_TITLE, ALERT_ACTIVE, ALERT_CREATED_AT, ALERT_UPDATED_AT])
}
