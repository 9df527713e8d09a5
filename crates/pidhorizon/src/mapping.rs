//! PID/TID mappings between two PID namespace views.

use std::collections::HashMap;

use nsiter_core::pid::Pid;

/// Maps PIDs/TIDs of one PID namespace one-to-one to the PIDs/TIDs of the
/// same tasks in another PID namespace.
///
/// See also: [`reverse`].
pub type Mapping<P> = HashMap<P, P>;

/// Returns a new mapping with keys and values swapped.
///
/// If `m` maps two keys to the same value, only one of them survives, and
/// which one depends on iteration order.
pub fn reverse<P: Pid>(m: &Mapping<P>) -> Mapping<P> {
    m.iter().map(|(&from, &to)| (to, from)).collect()
}

/// Look up `pid` in `m`, treating the zero and negative sentinels as
/// never present on either side.
pub fn lookup<P: Pid>(m: &Mapping<P>, pid: P) -> Option<P> {
    if !pid.is_valid() {
        return None;
    }
    m.get(&pid).copied().filter(|to| to.is_valid())
}
