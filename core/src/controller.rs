use crate::blueprint::Route;

/// A group of handlers that contributes routes to a blueprint.
///
/// Usually generated by `#[orchest_macros::controller]`, which names every
/// route `"<NAMESPACE>.<function>"`.
pub trait Controller<S> {
    const NAMESPACE: &'static str;

    fn routes() -> Vec<Route<S>>;
}
