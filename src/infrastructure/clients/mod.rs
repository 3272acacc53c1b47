pub(crate) mod espn;
