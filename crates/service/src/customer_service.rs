use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

use models::customer::{self, WriteOutcome};

use crate::errors::ServiceError;

/// List every customer, ordered by id. The storage layer makes no ordering
/// promise of its own, so the id order (equal to insertion order for this
/// table) is imposed here.
pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>, ServiceError> {
    let customers = customer::Entity::find()
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(customers)
}

/// Get a customer by id.
pub async fn get_customer(db: &DatabaseConnection, id: i32) -> Result<Option<customer::Model>, ServiceError> {
    let found = customer::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Create a customer. Absent fields are stored as NULL; the unique index on
/// email decides whether the write lands.
pub async fn create_customer(
    db: &DatabaseConnection,
    name: Option<String>,
    email: Option<String>,
    age: Option<i32>,
) -> Result<WriteOutcome, ServiceError> {
    let outcome = customer::insert(db, name, email, age).await?;
    Ok(outcome)
}

/// Apply a partial update to a customer. Only the allow-listed fields
/// (`name`, `email`, `age`) can change; a `None` argument leaves the stored
/// value untouched.
pub async fn patch_customer(
    db: &DatabaseConnection,
    id: i32,
    name: Option<String>,
    email: Option<String>,
    age: Option<i32>,
) -> Result<WriteOutcome, ServiceError> {
    let found = customer::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("customer"))?;

    if name.is_none() && email.is_none() && age.is_none() {
        // Nothing to write; hand back the record as-is.
        return Ok(WriteOutcome::Written(found));
    }

    let mut am: customer::ActiveModel = found.into();
    if let Some(v) = name {
        am.name = Set(Some(v));
    }
    if let Some(v) = email {
        am.email = Set(Some(v));
    }
    if let Some(v) = age {
        am.age = Set(Some(v));
    }
    let outcome = customer::persist(db, am).await?;
    Ok(outcome)
}

/// Hard-delete a customer. Returns whether a record was actually removed.
pub async fn delete_customer(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = customer::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn customer_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let out = create_customer(&db, Some("Ann".into()), Some("ann@x.com".into()), Some(30)).await?;
        let WriteOutcome::Written(ann) = out else { panic!("unexpected conflict") };
        assert_eq!(ann.id, 1);
        assert_eq!(ann.name.as_deref(), Some("Ann"));
        assert_eq!(ann.age, Some(30));

        // Duplicate email is a tagged outcome, not an error.
        let dup = create_customer(&db, Some("Imposter".into()), Some("ann@x.com".into()), None).await?;
        assert!(matches!(dup, WriteOutcome::EmailTaken));
        assert_eq!(list_customers(&db).await?.len(), 1);

        // Partial update leaves the other fields alone.
        let out = patch_customer(&db, ann.id, None, None, Some(31)).await?;
        let WriteOutcome::Written(updated) = out else { panic!("unexpected conflict") };
        assert_eq!(updated.name.as_deref(), Some("Ann"));
        assert_eq!(updated.email.as_deref(), Some("ann@x.com"));
        assert_eq!(updated.age, Some(31));

        // Patching onto a taken email conflicts.
        let out = create_customer(&db, Some("Bob".into()), Some("bob@x.com".into()), None).await?;
        let WriteOutcome::Written(bob) = out else { panic!("unexpected conflict") };
        let out = patch_customer(&db, bob.id, None, Some("ann@x.com".into()), None).await?;
        assert!(matches!(out, WriteOutcome::EmailTaken));

        // Delete, then the record is gone and a second delete misses.
        assert!(delete_customer(&db, ann.id).await?);
        assert!(get_customer(&db, ann.id).await?.is_none());
        assert!(!delete_customer(&db, ann.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn patch_missing_customer_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = patch_customer(&db, 999, None, None, Some(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn empty_patch_returns_record_unchanged() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let out = create_customer(&db, Some("Ann".into()), Some("ann@x.com".into()), Some(30)).await?;
        let WriteOutcome::Written(ann) = out else { panic!("unexpected conflict") };

        let out = patch_customer(&db, ann.id, None, None, None).await?;
        let WriteOutcome::Written(same) = out else { panic!("unexpected conflict") };
        assert_eq!(same, ann);
        Ok(())
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for (name, email) in [("C1", "c1@x.com"), ("C2", "c2@x.com"), ("C3", "c3@x.com")] {
            let out = create_customer(&db, Some(name.into()), Some(email.into()), None).await?;
            assert!(matches!(out, WriteOutcome::Written(_)));
        }
        let ids: Vec<i32> = list_customers(&db).await?.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        Ok(())
    }
}
