use sea_orm::{entity::prelude::*, ActiveValue::NotSet, DatabaseConnection, Set, SqlErr};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Outcome of a write that may trip the unique index on `email`.
///
/// The conflict is part of the normal result space rather than an error:
/// callers decide how to surface it.
#[derive(Debug)]
pub enum WriteOutcome {
    Written(Model),
    EmailTaken,
}

pub async fn insert(
    db: &DatabaseConnection,
    name: Option<String>,
    email: Option<String>,
    age: Option<i32>,
) -> Result<WriteOutcome, ModelError> {
    let am = ActiveModel {
        id: NotSet,
        name: Set(name),
        email: Set(email),
        age: Set(age),
    };
    match am.insert(db).await {
        Ok(m) => Ok(WriteOutcome::Written(m)),
        Err(e) => classify_write_err(e),
    }
}

/// Persist a modified record. The caller is expected to have `Set` only the
/// columns it wants changed.
pub async fn persist(db: &DatabaseConnection, am: ActiveModel) -> Result<WriteOutcome, ModelError> {
    match am.update(db).await {
        Ok(m) => Ok(WriteOutcome::Written(m)),
        Err(e) => classify_write_err(e),
    }
}

fn classify_write_err(e: DbErr) -> Result<WriteOutcome, ModelError> {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Ok(WriteOutcome::EmailTaken),
        _ => Err(ModelError::Db(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;

    async fn get_db() -> DatabaseConnection {
        let db = crate::db::connect_in_memory().await.expect("connect");
        migration::Migrator::up(&db, None).await.expect("migrate");
        db
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let db = get_db().await;
        let a = insert(&db, Some("Ann".into()), Some("ann@x.com".into()), Some(30))
            .await
            .expect("insert");
        let WriteOutcome::Written(a) = a else { panic!("unexpected conflict") };
        assert_eq!(a.id, 1);
        assert_eq!(a.email.as_deref(), Some("ann@x.com"));

        let b = insert(&db, Some("Bob".into()), Some("bob@x.com".into()), None)
            .await
            .expect("insert");
        let WriteOutcome::Written(b) = b else { panic!("unexpected conflict") };
        assert_eq!(b.id, 2);
        assert_eq!(b.age, None);
    }

    #[tokio::test]
    async fn duplicate_email_is_an_outcome_not_an_error() {
        let db = get_db().await;
        let first = insert(&db, Some("Ann".into()), Some("ann@x.com".into()), None)
            .await
            .expect("insert");
        assert!(matches!(first, WriteOutcome::Written(_)));

        let second = insert(&db, Some("Imposter".into()), Some("ann@x.com".into()), None)
            .await
            .expect("insert should classify the violation");
        assert!(matches!(second, WriteOutcome::EmailTaken));
    }

    #[tokio::test]
    async fn null_emails_do_not_collide() {
        let db = get_db().await;
        let a = insert(&db, Some("A".into()), None, None).await.expect("insert");
        let b = insert(&db, Some("B".into()), None, None).await.expect("insert");
        assert!(matches!(a, WriteOutcome::Written(_)));
        assert!(matches!(b, WriteOutcome::Written(_)));
    }

    #[tokio::test]
    async fn persist_detects_email_conflict_on_update() {
        let db = get_db().await;
        let _ = insert(&db, Some("Ann".into()), Some("ann@x.com".into()), None)
            .await
            .expect("insert");
        let bob = insert(&db, Some("Bob".into()), Some("bob@x.com".into()), None)
            .await
            .expect("insert");
        let WriteOutcome::Written(bob) = bob else { panic!("unexpected conflict") };

        let mut am: ActiveModel = bob.into();
        am.email = Set(Some("ann@x.com".into()));
        let out = persist(&db, am).await.expect("persist should classify the violation");
        assert!(matches!(out, WriteOutcome::EmailTaken));
    }
}
