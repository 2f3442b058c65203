mod machine;
mod output;
