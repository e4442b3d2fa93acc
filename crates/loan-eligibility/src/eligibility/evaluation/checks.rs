use super::policy::RejectionReason;

/// A single guard in an ordered rejection chain.
pub(crate) struct Check<C> {
    pub rejects: fn(&C) -> bool,
    pub reason: fn(&C) -> RejectionReason,
}

/// Runs `checks` left to right and reports the first one that rejects.
pub(crate) fn first_rejection<C>(checks: &[Check<C>], context: &C) -> Option<RejectionReason> {
    checks
        .iter()
        .find(|check| (check.rejects)(context))
        .map(|check| (check.reason)(context))
}
