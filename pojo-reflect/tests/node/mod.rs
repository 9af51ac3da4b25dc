mod adapter;
mod walk;
mod wrap;
