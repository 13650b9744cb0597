use std::sync::{Arc, PoisonError, RwLock};

use super::model::LogTable;

/// Holds the currently loaded table.
///
/// Readers get a shared snapshot; a new load replaces the whole pointer, so
/// a reader sees either the old table or the new one, never a mix.
#[derive(Debug, Default)]
pub struct TableHandle {
    current: RwLock<Option<Arc<LogTable>>>,
}

impl TableHandle {
    pub fn current(&self) -> Option<Arc<LogTable>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a new table, returning the one it replaced.
    pub fn replace(&self, table: LogTable) -> Option<Arc<LogTable>> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        slot.replace(Arc::new(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawColumn;

    fn table(rows: usize) -> LogTable {
        LogTable::from_columns(vec![RawColumn {
            name: "Time".to_string(),
            unit: "s".to_string(),
            values: vec![0.0; rows],
        }])
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let handle = TableHandle::default();
        assert!(handle.current().is_none());

        assert!(handle.replace(table(2)).is_none());
        let before = handle.current().unwrap();

        let previous = handle.replace(table(5)).unwrap();
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.row_count(), 2);
        assert_eq!(handle.current().unwrap().row_count(), 5);
    }
}
