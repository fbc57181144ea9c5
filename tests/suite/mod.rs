mod collaborator;
mod config;
mod form_flow;
