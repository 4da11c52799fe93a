mod run;
mod server;
