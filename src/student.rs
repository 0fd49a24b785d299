//! Student roster entry, the record type the store was built around.

use std::borrow::Cow;
use std::fmt;

use crate::hash;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub full_name: String,
    /// Decimal-digit id; the store key.
    pub student_id: String,
    pub gpa: f64,
    pub discipline: String,
}

impl Student {
    pub fn new(
        full_name: impl Into<String>,
        student_id: impl Into<String>,
        gpa: f64,
        discipline: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            student_id: student_id.into(),
            gpa,
            discipline: discipline.into(),
        }
    }

    /// Overwrite every field. Re-`set` the student afterwards if it is held
    /// in a store under its old id.
    pub fn update(
        &mut self,
        full_name: impl Into<String>,
        student_id: impl Into<String>,
        gpa: f64,
        discipline: impl Into<String>,
    ) {
        *self = Self::new(full_name, student_id, gpa, discipline);
    }
}

impl Record for Student {
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.student_id)
    }

    fn hash(&self) -> u64 {
        hash::jenkins_one_at_a_time(self.student_id.as_bytes())
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<15} {}", "Full Name:", self.full_name)?;
        writeln!(f, "{:<15} {}", "Student ID:", self.student_id)?;
        writeln!(f, "{:<15} {:.2}", "GPA:", self.gpa)?;
        write!(f, "{:<15} {}", "Discipline:", self.discipline)
    }
}
