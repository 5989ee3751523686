use super::{FacultyId, SectionId, SubjectCode};
use serde::{Deserialize, Serialize};

/// Closed classification of subject types. Modeled as a tagged enum rather
/// than an open string so invalid type/hour combinations can be normalized
/// in one place (see `Subject::normalize`) instead of re-checked at every
/// call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectType {
    /// Integrated core: theory plus lab.
    #[serde(rename = "IPCC")]
    IntegratedCoreTheoryPlusLab,
    #[serde(rename = "PCC")]
    CoreTheory,
    #[serde(rename = "PCCL")]
    CoreLab,
    #[serde(rename = "PEC")]
    ProfessionalElective,
    #[serde(rename = "OEC")]
    OpenElective,
    #[serde(rename = "HSMC")]
    Humanities,
    #[serde(rename = "MP")]
    Project,
    #[serde(rename = "INT")]
    Internship,
}

impl SubjectType {
    pub fn is_project(&self) -> bool {
        matches!(self, SubjectType::Project)
    }

    pub fn carries_theory(&self) -> bool {
        !matches!(
            self,
            SubjectType::CoreLab | SubjectType::Project | SubjectType::Internship
        )
    }

    pub fn carries_lab(&self) -> bool {
        matches!(
            self,
            SubjectType::IntegratedCoreTheoryPlusLab
                | SubjectType::CoreLab
                | SubjectType::Project
        )
    }
}

/// A teachable course instance offered to one section in one semester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub subject_code: SubjectCode,
    pub subject_name: String,
    pub subject_type: SubjectType,
    pub theory_hours: u32,
    pub lab_hours: u32,
    pub theory_faculty: Option<FacultyId>,
    pub lab_faculty: Option<FacultyId>,
    #[serde(default = "default_batches")]
    pub no_of_batches: u32,
    pub section: String,
    pub semester: String,
}

fn default_batches() -> u32 {
    1
}

impl Subject {
    /// The section id this subject's section/semester pair resolves to,
    /// shaped "SEMESTER_SECTION" (e.g. "6_A").
    pub fn section_id(&self) -> SectionId {
        SectionId(format!("{}_{}", self.semester, self.section))
    }

    /// Enforce the §3 type invariants, returning the (possibly adjusted)
    /// subject and a warning if anything was normalized. Violators are
    /// normalized, not rejected.
    pub fn normalize(mut self) -> (Self, Option<String>) {
        let mut warning = None;
        let mut note = |msg: String| {
            warning = Some(match warning.take() {
                Some(prev) => format!("{prev}; {msg}"),
                None => msg,
            });
        };

        if !self.subject_type.carries_theory() && self.theory_hours != 0 {
            note(format!(
                "subject '{}' is {:?} and cannot carry theory hours; cleared {} theory hours",
                self.subject_code, self.subject_type, self.theory_hours
            ));
            self.theory_hours = 0;
        }
        if !self.subject_type.carries_lab() && self.lab_hours != 0 {
            note(format!(
                "subject '{}' is {:?} and cannot carry lab hours; cleared {} lab hours",
                self.subject_code, self.subject_type, self.lab_hours
            ));
            self.lab_hours = 0;
        }
        if self.subject_type.is_project() && self.lab_hours % 3 != 0 {
            let rounded = (self.lab_hours / 3) * 3;
            note(format!(
                "project subject '{}' lab hours {} not a multiple of 3; rounded down to {}",
                self.subject_code, self.lab_hours, rounded
            ));
            self.lab_hours = rounded;
        }
        if matches!(self.subject_type, SubjectType::Internship)
            && (self.theory_hours != 0 || self.lab_hours != 0)
        {
            note(format!(
                "internship subject '{}' carries zero hours by definition",
                self.subject_code
            ));
            self.theory_hours = 0;
            self.lab_hours = 0;
        }

        (self, warning)
    }

    pub fn lab_block_size(&self) -> u32 {
        if self.subject_type.is_project() {
            3
        } else {
            2
        }
    }
}
