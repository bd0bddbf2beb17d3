//! Policy port - the decision rule X^π(S_t | θ)

use crate::{
    Result,
    model::{Decision, GovernanceState},
};

/// A decision rule mapping a state to one of its feasible actions.
///
/// Implementations must only return actions from
/// [`feasible_actions`](crate::model::feasible_actions) for the given state,
/// and must fail with [`Error::NoFeasibleActions`](crate::Error::NoFeasibleActions)
/// when that set is empty.
///
/// # Examples
///
/// ```
/// use sdam::{
///     Error, Result,
///     model::{Decision, GovernanceState, feasible_actions},
///     ports::Policy,
/// };
///
/// struct FirstAction;
///
/// impl Policy for FirstAction {
///     fn decide(&self, state: &GovernanceState) -> Result<Decision> {
///         feasible_actions(state)
///             .first()
///             .copied()
///             .ok_or(Error::NoFeasibleActions { stage: state.stage })
///     }
///
///     fn name(&self) -> &str {
///         "first"
///     }
/// }
///
/// let state = GovernanceState::default_scenario();
/// assert_eq!(FirstAction.decide(&state).unwrap(), Decision::Escalate);
/// ```
pub trait Policy: Send {
    /// Choose an action for `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoFeasibleActions`](crate::Error::NoFeasibleActions)
    /// past the last stage of the decision process.
    fn decide(&self, state: &GovernanceState) -> Result<Decision>;

    /// Label used in episode results, comparisons and logs.
    fn name(&self) -> &str;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn decide(&self, state: &GovernanceState) -> Result<Decision> {
        (**self).decide(state)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
