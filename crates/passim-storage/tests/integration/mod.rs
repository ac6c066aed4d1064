mod fan_out;
mod rebuild_equivalence;
mod rollback;
mod scenarios;
mod vocabulary;
