pub(crate) mod merge;
pub(crate) mod show;
pub(crate) mod sync;
