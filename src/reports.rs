//! Read-side inspection of the school database: tables, schemas, canned reports
//! and ad-hoc SQL.

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::fmt;
use std::io;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("unknown report: {0}")]
    UnknownReport(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A single value of a result row, typed by SQLite's storage class.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Real(v) => write!(f, "{}", v),
            Cell::Text(v) => write!(f, "{}", v),
            Cell::Blob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

/// Column names plus rows of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl QueryResult {
    /// Render as a ` | `-separated table with a dashed rule under the header.
    pub fn render_table(&self) -> String {
        if self.rows.is_empty() {
            return "(no rows)\n".to_string();
        }

        let header = self.columns.join(" | ");
        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');
        out.push_str(&"-".repeat(header.len()));
        out.push('\n');
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(Cell::to_string).collect();
            out.push_str(&line.join(" | "));
            out.push('\n');
        }
        out.push_str(&format!("\n{} row(s)\n", self.rows.len()));
        out
    }

    /// Write header and rows as CSV; NULL becomes an empty field.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(&self.columns)?;
        for row in &self.rows {
            csv.write_record(row.iter().map(|cell| match cell {
                Cell::Null => String::new(),
                other => other.to_string(),
            }))?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Declared column of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// Canned reports over students, teachers and courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    StudentsByGrade,
    TeachersBySubject,
    CoursesWithTeachers,
    RecentStudents,
    TeacherWorkload,
    StudentStats,
    CourseStats,
}

impl Report {
    pub const ALL: [Report; 7] = [
        Report::StudentsByGrade,
        Report::TeachersBySubject,
        Report::CoursesWithTeachers,
        Report::RecentStudents,
        Report::TeacherWorkload,
        Report::StudentStats,
        Report::CourseStats,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Report::StudentsByGrade => "students_by_grade",
            Report::TeachersBySubject => "teachers_by_subject",
            Report::CoursesWithTeachers => "courses_with_teachers",
            Report::RecentStudents => "recent_students",
            Report::TeacherWorkload => "teacher_workload",
            Report::StudentStats => "student_stats",
            Report::CourseStats => "course_stats",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Report::StudentsByGrade => "Students grouped by grade",
            Report::TeachersBySubject => "Teachers grouped by subject",
            Report::CoursesWithTeachers => "Courses with teacher details",
            Report::RecentStudents => "Students added in the last 7 days",
            Report::TeacherWorkload => "Course assignments per teacher",
            Report::StudentStats => "Student counts and birth date range by grade",
            Report::CourseStats => "Course counts and credits by subject",
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Report::StudentsByGrade => {
                "SELECT grade, COUNT(*) AS student_count FROM student GROUP BY grade ORDER BY grade"
            }
            Report::TeachersBySubject => {
                "SELECT subject, COUNT(*) AS teacher_count FROM teacher GROUP BY subject ORDER BY subject"
            }
            Report::CoursesWithTeachers => {
                "SELECT c.name AS course_name, c.credits, t.name AS teacher_name, t.subject \
                 FROM course c JOIN teacher t ON c.teacher_id = t.id ORDER BY c.id"
            }
            Report::RecentStudents => {
                "SELECT name, grade, email, created_at FROM student \
                 WHERE created_at >= date('now', '-7 days') ORDER BY created_at DESC"
            }
            Report::TeacherWorkload => {
                "SELECT t.name AS teacher, t.subject, COUNT(c.id) AS courses_teaching, \
                 COALESCE(SUM(c.credits), 0) AS total_credits \
                 FROM teacher t LEFT JOIN course c ON t.id = c.teacher_id \
                 GROUP BY t.id ORDER BY courses_teaching DESC, t.id"
            }
            Report::StudentStats => {
                "SELECT grade, COUNT(*) AS students, MAX(date_of_birth) AS youngest, \
                 MIN(date_of_birth) AS oldest FROM student GROUP BY grade ORDER BY grade"
            }
            Report::CourseStats => {
                "SELECT t.subject, COUNT(c.id) AS courses, AVG(c.credits) AS avg_credits, \
                 COALESCE(SUM(c.credits), 0) AS total_credits \
                 FROM teacher t LEFT JOIN course c ON t.id = c.teacher_id \
                 GROUP BY t.subject ORDER BY courses DESC, t.subject"
            }
        }
    }

    pub async fn run(&self, pool: &SqlitePool) -> Result<QueryResult, ReportError> {
        run_query(pool, self.sql()).await
    }
}

impl FromStr for Report {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Report::ALL
            .into_iter()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| ReportError::UnknownReport(s.to_string()))
    }
}

/// User tables, sorted by name.
pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>, ReportError> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(names)
}

/// Declared columns of an existing table.
pub async fn describe_table(pool: &SqlitePool, table: &str) -> Result<Vec<ColumnInfo>, ReportError> {
    // Only names read back from sqlite_master are interpolated into the pragma.
    if !list_tables(pool).await?.iter().any(|t| t == table) {
        return Err(ReportError::UnknownTable(table.to_string()));
    }

    let rows = sqlx::query(&format!("PRAGMA table_info(\"{}\")", table))
        .fetch_all(pool)
        .await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let not_null: i64 = row.try_get("notnull")?;
        let pk: i64 = row.try_get("pk")?;
        columns.push(ColumnInfo {
            name: row.try_get("name")?,
            declared_type: row.try_get("type")?,
            not_null: not_null != 0,
            primary_key: pk != 0,
        });
    }
    Ok(columns)
}

/// Every row of an existing table.
pub async fn dump_table(pool: &SqlitePool, table: &str) -> Result<QueryResult, ReportError> {
    if !list_tables(pool).await?.iter().any(|t| t == table) {
        return Err(ReportError::UnknownTable(table.to_string()));
    }
    run_query(pool, &format!("SELECT * FROM \"{}\"", table)).await
}

/// Run arbitrary SQL and collect whatever rows it yields.
pub async fn run_query(pool: &SqlitePool, sql: &str) -> Result<QueryResult, ReportError> {
    let rows = sqlx::query(sql).fetch_all(pool).await?;

    let columns = rows
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();

    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        let cells = (0..row.len())
            .map(|index| cell(row, index))
            .collect::<Result<Vec<_>, _>>()?;
        out.push(cells);
    }

    Ok(QueryResult { columns, rows: out })
}

fn cell(row: &SqliteRow, index: usize) -> Result<Cell, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Cell::Null);
    }

    let storage_class = raw.type_info().name().to_string();
    let cell = match storage_class.as_str() {
        "INTEGER" | "BOOLEAN" => Cell::Integer(row.try_get_unchecked(index)?),
        "REAL" => Cell::Real(row.try_get_unchecked(index)?),
        "BLOB" => Cell::Blob(row.try_get_unchecked(index)?),
        _ => Cell::Text(row.try_get_unchecked(index)?),
    };
    Ok(cell)
}
