//! Single-record operations on transactions.
//!
//! Each operation validates its input before touching the store and turns an
//! absent record into [Error::NotFound].

use serde_json::Value;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        core::Transaction,
        store::TransactionStore,
        validation::{validate_create, validate_update},
    },
};

/// Validate `payload` and store it as a new transaction.
///
/// # Errors
/// Returns [Error::Validation] if the payload is invalid, or an error from the store.
pub fn create_transaction(
    store: &impl TransactionStore,
    payload: &Value,
) -> Result<Transaction, Error> {
    let new_transaction = validate_create(payload)?;

    store.insert(new_transaction)
}

/// Retrieve the transaction with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such transaction.
pub fn get_transaction(store: &impl TransactionStore, id: TransactionId) -> Result<Transaction, Error> {
    store.find_by_id(id)?.ok_or(Error::NotFound)
}

/// Validate `payload` as a partial update and apply it to the transaction with `id`.
///
/// # Errors
/// Returns [Error::Validation] if the payload is invalid, [Error::NotFound]
/// if there is no such transaction, or an error from the store.
pub fn update_transaction(
    store: &impl TransactionStore,
    id: TransactionId,
    payload: &Value,
) -> Result<Transaction, Error> {
    let patch = validate_update(payload)?;

    store.update_by_id(id, &patch)?.ok_or(Error::NotFound)
}

/// Remove the transaction with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such transaction.
pub fn delete_transaction(store: &impl TransactionStore, id: TransactionId) -> Result<(), Error> {
    if store.delete_by_id(id)? {
        Ok(())
    } else {
        Err(Error::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        test_utils::get_test_store,
        transaction::{
            core::TransactionType,
            service::{create_transaction, delete_transaction, get_transaction, update_transaction},
        },
    };

    #[test]
    fn create_returns_stored_record() {
        let store = get_test_store();

        let got = create_transaction(
            &store,
            &json!({ "type": "income", "amount": 50.25, "date": "2024-01-15" }),
        )
        .unwrap();

        assert_eq!(got.amount, 50.25);
        assert_eq!(got.type_, TransactionType::Income);
        assert_eq!(got.date, datetime!(2024-01-15 0:00 UTC));
        assert_eq!(get_transaction(&store, got.id), Ok(got));
    }

    #[test]
    fn created_ids_are_unique() {
        let store = get_test_store();
        let payload = json!({ "type": "expense", "amount": 1, "date": "2024-01-15" });

        let first = create_transaction(&store, &payload).unwrap();
        let second = create_transaction(&store, &payload).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn invalid_create_does_not_touch_store() {
        let store = get_test_store();

        let result = create_transaction(&store, &json!({ "type": "income", "amount": -1 }));

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(get_transaction(&store, 1), Err(Error::NotFound));
    }

    #[test]
    fn update_leaves_omitted_fields_unchanged() {
        let store = get_test_store();
        let created = create_transaction(
            &store,
            &json!({
                "type": "expense",
                "amount": 20,
                "description": "Dinner",
                "category": "Food",
                "date": "2024-01-15"
            }),
        )
        .unwrap();

        let updated =
            update_transaction(&store, created.id, &json!({ "description": "Lunch" })).unwrap();

        assert_eq!(updated.description, "Lunch");
        assert_eq!(updated.amount, created.amount);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn empty_update_is_rejected() {
        let store = get_test_store();
        let created = create_transaction(
            &store,
            &json!({ "type": "expense", "amount": 20, "date": "2024-01-15" }),
        )
        .unwrap();

        let result = update_transaction(&store, created.id, &json!({}));

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn update_missing_is_not_found() {
        let store = get_test_store();

        let result = update_transaction(&store, 99, &json!({ "amount": 1 }));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn deleting_twice_is_not_found() {
        let store = get_test_store();
        let created = create_transaction(
            &store,
            &json!({ "type": "income", "amount": 5, "date": "2024-01-15" }),
        )
        .unwrap();

        assert_eq!(delete_transaction(&store, created.id), Ok(()));
        assert_eq!(delete_transaction(&store, created.id), Err(Error::NotFound));
        assert_eq!(get_transaction(&store, created.id), Err(Error::NotFound));
    }

    #[test]
    fn deleting_nonexistent_is_not_found() {
        let store = get_test_store();

        assert_eq!(delete_transaction(&store, 1), Err(Error::NotFound));
    }
}
