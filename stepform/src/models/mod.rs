// Data records handed to collaborators outside the form core.

pub mod submission;
