/// Stage of an audited `save_changes` call.
///
/// Calls without audited changes go `CapturingChanges -> PrimaryCommitting -> Committed`
/// without a transaction. Any failure after the transaction was opened passes through
/// `RollingBack` before `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PersisterState {
    #[default]
    Idle,
    CapturingChanges,
    PrimaryCommitting,
    Finalizing,
    Mapping,
    AuditCommitting,
    Committed,
    RollingBack,
    Failed,
}

impl std::fmt::Display for PersisterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
