pub(crate) mod field;
pub(crate) mod fragment;
pub(crate) mod pointer;
pub(crate) mod texture;
