pub(crate) mod challenges;
pub(crate) mod favorites;
pub(crate) mod remedies;
