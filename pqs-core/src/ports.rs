mod eigensolver;

pub use eigensolver::Eigensolver;
