use thiserror::Error;

/// Domain-specific errors for the timetable solver
#[derive(Error, Debug)]
pub enum SchedulerError {
    // Input/Parse errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in '{file}': {message}")]
    JsonParse { file: String, message: String },

    #[error("Input malformed: {0}")]
    InputMalformed(String),

    // Data validation errors
    #[error("Subject '{subject_code}' references unknown section '{section_id}'")]
    UnknownSection {
        subject_code: String,
        section_id: String,
    },

    #[error("Duplicate ID found: {id_type} '{id}'")]
    DuplicateId { id_type: String, id: String },

    #[error("Subject '{subject_code}' has no qualified faculty for {role}")]
    NoQualifiedFaculty { subject_code: String, role: String },

    // Solver errors
    #[error("No feasible candidate could be constructed")]
    Infeasible,

    #[error("Solver timeout after {seconds} seconds")]
    SolverTimeout { seconds: u64 },
}

/// Use anyhow::Result at application boundaries
pub type Result<T> = anyhow::Result<T>;
