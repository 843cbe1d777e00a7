mod constructor;
mod observer;
mod store;

pub use constructor::*;
pub use observer::ObserverId;
pub(crate) use observer::ObserverVarId;
pub use observer::VariableObserver;
pub use store::ObserverHandle;
pub(crate) use store::ObserverStore;
