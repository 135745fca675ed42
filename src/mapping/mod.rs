pub(crate) mod arrangement;
