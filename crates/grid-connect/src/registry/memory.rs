use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::storage::{FoundOrCreated, InstallerColumns, InstallerTable, Row, StoreError, Table};

/// Mutex-guarded table used by the server and tests in place of a database.
pub struct MemoryTable<C> {
    state: Mutex<TableState<C>>,
}

struct TableState<C> {
    next_id: i64,
    rows: BTreeMap<i64, Row<C>>,
}

impl<C> TableState<C> {
    fn insert(&mut self, columns: C) -> &Row<C> {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.entry(id).or_insert(Row {
            id,
            created_at: Utc::now(),
            columns,
        })
    }
}

impl<C> Default for MemoryTable<C> {
    fn default() -> Self {
        Self {
            state: Mutex::new(TableState {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl<C> MemoryTable<C> {
    fn lock(&self) -> Result<MutexGuard<'_, TableState<C>>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("table mutex poisoned".to_string()))
    }
}

#[async_trait]
impl<C> Table<C> for MemoryTable<C>
where
    C: Clone + Send + Sync + 'static,
{
    async fn list(&self) -> Result<Vec<Row<C>>, StoreError> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Row<C>>, StoreError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn insert(&self, columns: C) -> Result<Row<C>, StoreError> {
        let mut state = self.lock()?;
        Ok(state.insert(columns).clone())
    }

    async fn update(&self, id: i64, columns: C) -> Result<Option<Row<C>>, StoreError> {
        let mut state = self.lock()?;
        Ok(state.rows.get_mut(&id).map(|row| {
            row.columns = columns;
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.lock()?.rows.remove(&id);
        Ok(())
    }
}

/// Installer table whose find-or-create scans and inserts under a single lock.
#[derive(Default)]
pub struct MemoryInstallerTable {
    table: MemoryTable<InstallerColumns>,
}

#[async_trait]
impl Table<InstallerColumns> for MemoryInstallerTable {
    async fn list(&self) -> Result<Vec<Row<InstallerColumns>>, StoreError> {
        self.table.list().await
    }

    async fn get(&self, id: i64) -> Result<Option<Row<InstallerColumns>>, StoreError> {
        self.table.get(id).await
    }

    async fn insert(&self, columns: InstallerColumns) -> Result<Row<InstallerColumns>, StoreError> {
        self.table.insert(columns).await
    }

    async fn update(
        &self,
        id: i64,
        columns: InstallerColumns,
    ) -> Result<Option<Row<InstallerColumns>>, StoreError> {
        self.table.update(id, columns).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.table.delete(id).await
    }
}

#[async_trait]
impl InstallerTable for MemoryInstallerTable {
    async fn find_or_create(
        &self,
        company: &str,
        registration_number: &str,
    ) -> Result<FoundOrCreated, StoreError> {
        let mut state = self.table.lock()?;
        let existing = state
            .rows
            .values()
            .find(|row| row.columns.registration_number == registration_number)
            .cloned();

        if let Some(row) = existing {
            return Ok(FoundOrCreated {
                row,
                created: false,
            });
        }

        let row = state
            .insert(InstallerColumns {
                company: company.to_string(),
                registration_number: registration_number.to_string(),
            })
            .clone();
        Ok(FoundOrCreated { row, created: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::storage::AddressColumns;
    use std::sync::Arc;

    fn address(city: &str) -> AddressColumns {
        AddressColumns {
            street: "Am Deich".to_string(),
            house_number: "3".to_string(),
            post_code: "25761".to_string(),
            city: city.to_string(),
        }
    }

    fn installer(company: &str, registration_number: &str) -> InstallerColumns {
        InstallerColumns {
            company: company.to_string(),
            registration_number: registration_number.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids_and_lists_in_order() {
        let table = MemoryTable::<AddressColumns>::default();
        let first = table.insert(address("Büsum")).await.unwrap();
        let second = table.insert(address("Heide")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        let cities: Vec<_> = table
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.columns.city)
            .collect();
        assert_eq!(cities, vec!["Büsum", "Heide"]);
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_misses_unknown_ids() {
        let table = MemoryTable::<AddressColumns>::default();
        let row = table.insert(address("Büsum")).await.unwrap();
        let updated = table
            .update(row.id, address("Husum"))
            .await
            .unwrap()
            .expect("row exists");
        assert_eq!(updated.created_at, row.created_at);
        assert_eq!(updated.columns.city, "Husum");
        assert_eq!(table.update(99, address("Husum")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_ids_are_not_reused() {
        let table = MemoryTable::<AddressColumns>::default();
        let row = table.insert(address("Büsum")).await.unwrap();
        table.delete(row.id).await.unwrap();
        table.delete(row.id).await.unwrap();
        assert_eq!(table.get(row.id).await.unwrap(), None);
        let next = table.insert(address("Heide")).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn find_or_create_prefers_first_existing_row() {
        let table = MemoryInstallerTable::default();
        let first = table.insert(installer("Acme", "REG-1")).await.unwrap();
        table.insert(installer("Acme Duplicate", "REG-1")).await.unwrap();

        let found = table.find_or_create("Other", "REG-1").await.unwrap();
        assert!(!found.created);
        assert_eq!(found.row.id, first.id);
        assert_eq!(table.list().await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_find_or_create_inserts_once() {
        let table = Arc::new(MemoryInstallerTable::default());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let table = table.clone();
                tokio::spawn(async move { table.find_or_create("Acme", "R-42").await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            let outcome = handle.await.expect("task joins").expect("store call");
            assert_eq!(outcome.row.id, 1);
            created += usize::from(outcome.created);
        }
        assert_eq!(created, 1);
        assert_eq!(table.list().await.unwrap().len(), 1);
    }
}
