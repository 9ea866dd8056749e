pub(crate) mod displace;
pub(crate) mod graph;
pub(crate) mod post;
