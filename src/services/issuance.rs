//! Moving stock from the catalog to a department.
//!
//! The decrement and both ledger appends run in one store transaction. The
//! decrement is conditional on the stock still being there, so two requests
//! racing past the precondition check cannot over-issue.

use chrono::NaiveDate;

use crate::{
    error::InventoryError,
    models::{NewIssuedItem, NewLedgerEntry, TransactionType},
    store::InventoryStore,
    utils::parse_positive_id,
};

#[derive(Debug, Clone, PartialEq)]
pub struct IssueRequest {
    pub item_id: i64,
    pub quantity: i64,
    pub department_name: String,
}

impl IssueRequest {
    /// Validates the raw values submitted on the issue form.
    pub fn parse(item_id: &str, quantity: &str, department_name: &str) -> Result<Self, InventoryError> {
        let item_id = parse_positive_id(item_id)
            .ok_or_else(|| InventoryError::validation("Invalid item ID. Please enter a valid number."))?;

        let quantity = quantity
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| InventoryError::validation("Quantity must be a whole number greater than zero."))?;

        let department_name = department_name.trim();
        if department_name.is_empty() {
            return Err(InventoryError::validation("Department name is required."));
        }

        Ok(Self {
            item_id,
            quantity,
            department_name: department_name.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueOutcome {
    pub item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub department_name: String,
    pub remaining: i64,
    pub date_issued: NaiveDate,
}

impl IssueOutcome {
    pub fn message(&self) -> String {
        format!("{} {} issued to {}.", self.quantity, self.item_name, self.department_name)
    }
}

pub async fn issue_item(
    store: &dyn InventoryStore,
    request: &IssueRequest,
    today: NaiveDate,
) -> Result<IssueOutcome, InventoryError> {
    if request.quantity <= 0 {
        return Err(InventoryError::validation("Quantity must be a whole number greater than zero."));
    }

    let item = store
        .find_item(request.item_id)
        .await?
        .filter(|item| item.is_active)
        .ok_or(InventoryError::NotFound(request.item_id))?;

    if request.quantity > item.quantity {
        log::warn!(
            "refused to issue {} of item {}: {} on hand",
            request.quantity, item.id, item.quantity
        );
        return Err(InventoryError::InsufficientStock {
            name: item.name,
            requested: request.quantity,
            available: item.quantity,
        });
    }

    let mut tx = store.begin().await?;

    let Some(remaining) = tx.decrement_quantity(item.id, request.quantity).await? else {
        // Stock moved between the check and the write; release the
        // transaction before reading the current level.
        drop(tx);
        let available = store
            .find_item(item.id)
            .await?
            .filter(|current| current.is_active)
            .map(|current| current.quantity)
            .unwrap_or(0);
        log::warn!(
            "lost the race issuing {} of item {}: {} left",
            request.quantity, item.id, available
        );
        return Err(InventoryError::InsufficientStock {
            name: item.name,
            requested: request.quantity,
            available,
        });
    };

    tx.append_issued_item(&NewIssuedItem {
        item_id: item.id,
        name: item.name.clone(),
        quantity_issued: request.quantity,
        date_issued: today,
        department_name: request.department_name.clone(),
    })
    .await?;

    tx.append_ledger_entry(&NewLedgerEntry {
        item_id: item.id,
        transaction_type: TransactionType::Issue,
        quantity: request.quantity,
        transaction_date: today,
    })
    .await?;

    tx.commit().await?;

    log::info!(
        "issued {} of item {} to {}",
        request.quantity, item.id, request.department_name
    );

    Ok(IssueOutcome {
        item_id: item.id,
        item_name: item.name,
        quantity: request.quantity,
        department_name: request.department_name.clone(),
        remaining,
        date_issued: today,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewItem;
    use crate::store::{memory::MemoryStore, InventoryStore, StoreError};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    async fn store_with(items: &[(i64, &str, i64)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (id, name, quantity) in items {
            store
                .insert_item(&NewItem {
                    id: Some(*id),
                    name: name.to_string(),
                    quantity: *quantity,
                    unit: "pcs".to_string(),
                    cost_per_unit: 1.0,
                    selling_price: 1.5,
                    supplier: None,
                    date_added: today(),
                    location: None,
                    min_stock_level: None,
                    max_stock_level: None,
                    reorder_quantity: None,
                    notes: None,
                    current_date: today(),
                })
                .await
                .unwrap();
        }
        store
    }

    fn request(item_id: i64, quantity: i64, department: &str) -> IssueRequest {
        IssueRequest { item_id, quantity, department_name: department.to_string() }
    }

    async fn quantity_of(store: &MemoryStore, id: i64) -> i64 {
        store.find_item(id).await.unwrap().unwrap().quantity
    }

    #[tokio::test]
    async fn issuing_part_of_the_stock_writes_both_ledgers() {
        let store = store_with(&[(1, "Reagent", 10)]).await;

        let outcome = issue_item(&store, &request(1, 4, "Lab A"), today()).await.unwrap();

        assert_eq!(outcome.remaining, 6);
        assert_eq!(outcome.message(), "4 Reagent issued to Lab A.");
        assert_eq!(quantity_of(&store, 1).await, 6);

        let issued = store.issued_items().await;
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].item_id, 1);
        assert_eq!(issued[0].quantity_issued, 4);
        assert_eq!(issued[0].department_name, "Lab A");
        assert_eq!(issued[0].name, "Reagent");

        let ledger = store.ledger().await;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].item_id, 1);
        assert_eq!(ledger[0].transaction_type, TransactionType::Issue);
        assert_eq!(ledger[0].quantity, 4);
        assert_eq!(ledger[0].transaction_date, issued[0].date_issued);
    }

    #[tokio::test]
    async fn remaining_reflects_the_committed_write() {
        let store = store_with(&[(1, "Reagent", 10)]).await;

        let first = issue_item(&store, &request(1, 3, "Lab A"), today()).await.unwrap();
        let second = issue_item(&store, &request(1, 3, "Lab B"), today()).await.unwrap();

        assert_eq!((first.remaining, second.remaining), (7, 4));
        assert_eq!(quantity_of(&store, 1).await, second.remaining);
    }

    #[tokio::test]
    async fn issuing_everything_on_hand_is_allowed() {
        let store = store_with(&[(1, "Reagent", 10)]).await;

        issue_item(&store, &request(1, 10, "Lab A"), today()).await.unwrap();

        assert_eq!(quantity_of(&store, 1).await, 0);
    }

    #[tokio::test]
    async fn every_amount_within_stock_leaves_the_difference() {
        for amount in 1..=7 {
            let store = store_with(&[(5, "Filter", 7)]).await;
            issue_item(&store, &request(5, amount, "Stores"), today()).await.unwrap();
            assert_eq!(quantity_of(&store, 5).await, 7 - amount);
        }
    }

    #[tokio::test]
    async fn over_issuing_changes_nothing() {
        let store = store_with(&[(2, "Gloves", 3)]).await;

        let err = issue_item(&store, &request(2, 5, "Lab B"), today()).await.unwrap_err();

        assert!(matches!(
            err,
            InventoryError::InsufficientStock { requested: 5, available: 3, .. }
        ));
        assert_eq!(quantity_of(&store, 2).await, 3);
        assert!(store.issued_items().await.is_empty());
        assert!(store.ledger().await.is_empty());
    }

    #[tokio::test]
    async fn non_positive_quantity_changes_nothing() {
        let store = store_with(&[(2, "Gloves", 3)]).await;

        for amount in [0, -1] {
            let err = issue_item(&store, &request(2, amount, "Lab B"), today()).await.unwrap_err();
            assert!(matches!(err, InventoryError::Validation(_)));
        }
        assert_eq!(quantity_of(&store, 2).await, 3);
        assert!(store.issued_items().await.is_empty());
        assert!(store.ledger().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let store = store_with(&[(1, "Reagent", 10)]).await;

        let err = issue_item(&store, &request(999, 1, "X"), today()).await.unwrap_err();

        assert!(matches!(err, InventoryError::NotFound(999)));
        assert!(store.issued_items().await.is_empty());
        assert!(store.ledger().await.is_empty());
    }

    #[tokio::test]
    async fn archived_item_cannot_be_issued() {
        let store = store_with(&[(1, "Reagent", 10)]).await;
        store.archive_item(1).await.unwrap();

        let err = issue_item(&store, &request(1, 1, "Lab A"), today()).await.unwrap_err();

        assert!(matches!(err, InventoryError::NotFound(1)));
    }

    #[tokio::test]
    async fn failed_ledger_write_rolls_back_the_whole_issuance() {
        let store = store_with(&[(1, "Reagent", 10)]).await;
        store.fail_ledger_appends();

        let err = issue_item(&store, &request(1, 4, "Lab A"), today()).await.unwrap_err();

        assert!(matches!(err, InventoryError::Storage(StoreError::Unavailable(_))));
        assert_eq!(quantity_of(&store, 1).await, 10);
        assert!(store.issued_items().await.is_empty());
        assert!(store.ledger().await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_issues_never_exceed_stock() {
        let store = store_with(&[(1, "Reagent", 10)]).await;

        let mut tasks = Vec::new();
        for n in 0..5 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                issue_item(&store, &request(1, 3, &format!("Dept {}", n)), today()).await
            }));
        }

        let mut succeeded = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(err) => assert!(matches!(err, InventoryError::InsufficientStock { .. })),
            }
        }

        assert_eq!(succeeded, 3);
        assert_eq!(quantity_of(&store, 1).await, 1);
        assert_eq!(store.issued_items().await.len(), 3);
        assert_eq!(store.ledger().await.len(), 3);
    }

    #[test]
    fn parse_validates_form_values() {
        let parsed = IssueRequest::parse("12", " 3 ", "  Lab A ").unwrap();
        assert_eq!(parsed, request(12, 3, "Lab A"));

        let bad_id = IssueRequest::parse("12a", "3", "Lab A").unwrap_err();
        assert_eq!(bad_id.to_string(), "Invalid item ID. Please enter a valid number.");

        assert!(IssueRequest::parse("12", "0", "Lab A").is_err());
        assert!(IssueRequest::parse("12", "-2", "Lab A").is_err());
        assert!(IssueRequest::parse("12", "two", "Lab A").is_err());
        assert!(IssueRequest::parse("12", "2", "   ").is_err());
    }
}
