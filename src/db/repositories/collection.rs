//! One implementation of the history CRUD shared by every collection.
//!
//! A collection only describes how its drafts become rows and how rows become
//! records; ordering, limits and transactions live in [`CollectionRepository`].

use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::marker::PhantomData;

pub(crate) type ModelOf<C> = <<C as HistoryCollection>::Entity as EntityTrait>::Model;
pub(crate) type ColumnOf<C> = <<C as HistoryCollection>::Entity as EntityTrait>::Column;
pub(crate) type KeyOf<C> =
    <<<C as HistoryCollection>::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

pub trait HistoryCollection: Send + Sync + 'static {
    /// Table name, also used to label errors and log lines.
    const NAME: &'static str;

    type Entity: EntityTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + Send;
    type Draft: Send;
    type Record: Send;

    fn id_column() -> ColumnOf<Self>;

    fn timestamp_column() -> ColumnOf<Self>;

    fn active_model(draft: Self::Draft, timestamp: i64) -> Result<Self::ActiveModel>;

    fn record(model: ModelOf<Self>) -> Result<Self::Record>;
}

pub struct CollectionRepository<C> {
    conn: DatabaseConnection,
    _collection: PhantomData<C>,
}

impl<C> CollectionRepository<C>
where
    C: HistoryCollection,
    ModelOf<C>: Sync,
    KeyOf<C>: Into<i64>,
{
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            _collection: PhantomData,
        }
    }

    pub async fn add(&self, draft: C::Draft, timestamp: i64) -> Result<i64> {
        let active_model = C::active_model(draft, timestamp)?;

        let txn = self.conn.begin().await?;
        let result = C::Entity::insert(active_model).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.last_insert_id.into())
    }

    /// Newest first. Ties on `timestamp` fall back to the id so the order is total.
    pub async fn recent(&self, limit: u64) -> Result<Vec<C::Record>> {
        let models = C::Entity::find()
            .order_by_desc(C::timestamp_column())
            .order_by_desc(C::id_column())
            .limit(limit)
            .all(&self.conn)
            .await?;

        models.into_iter().map(C::record).collect()
    }

    pub async fn delete(&self, id: i64) -> Result<u64> {
        let txn = self.conn.begin().await?;
        let result = C::Entity::delete_many()
            .filter(C::id_column().eq(id))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        Ok(result.rows_affected)
    }

    pub async fn clear(&self) -> Result<u64> {
        let txn = self.conn.begin().await?;
        let result = C::Entity::delete_many().exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(C::Entity::find().count(&self.conn).await?)
    }
}
