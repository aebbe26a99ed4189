//! Result-page extractor
//!
//! The portal's markup has no stable element identifiers: tables are
//! positional, semantic roles hang off style classes (`tr.info` for
//! semester headers, `tr.thcolor` for subject-table headers, an inline
//! background-color for summary blocks), and identity fields are plain
//! label/value paragraph pairs. Extraction is therefore a single forward
//! pass of independently guarded rules: a malformed block is skipped, and
//! only the two load-bearing preconditions (at least two tables, a complete
//! identity block) invalidate the whole page.

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;
use crate::models::{SemesterRecord, StudentRecord, SubjectRecord, SummaryRecord};
use crate::parser::sanitize::clean_cell_text;

/// Inline style marker identifying a semester summary table
const SUMMARY_MARKER: &str = "background-color: #d99900";

/// Identity labels in the second table, each immediately followed by its value
const ROLL_LABEL: &str = "ROLL NUMBER";
const NAME_LABEL: &str = "STUDENT NAME";
const FATHER_LABEL: &str = "FATHER NAME";

/// Minimum cells for a subject row to qualify
const SUBJECT_CELLS: usize = 6;

/// Minimum cells for a summary table to qualify
const SUMMARY_CELLS: usize = 5;

/// Result-page HTML extractor
///
/// # Examples
///
/// ```
/// use parinaam::parser::ResultExtractor;
///
/// let html = r#"
///   <table><tr><td>NIT HAMIRPUR</td></tr></table>
///   <table><tr>
///     <td><p>ROLL NUMBER</p><p>21BCS005</p></td>
///     <td><p>STUDENT NAME</p><p>A STUDENT</p></td>
///     <td><p>FATHER NAME</p><p>A FATHER</p></td>
///   </tr></table>
///   <table><tr class="info"><td>Semester : I</td></tr></table>
///   <table>
///     <tr class="thcolor"><th>Sno</th></tr>
///     <tr><td>1</td><td>MATHS-I</td><td>MA-101</td><td>4</td><td>A</td><td>40</td></tr>
///   </table>
/// "#;
///
/// let extractor = ResultExtractor::new();
/// let record = extractor.extract(html).unwrap();
/// assert_eq!(record.roll_number, "21BCS005");
/// assert_eq!(record.semesters[0].semester, "I");
/// assert_eq!(record.semesters[0].subjects.len(), 1);
/// ```
pub struct ResultExtractor {
    table: Selector,
    semester_header: Selector,
    subject_header: Selector,
    row: Selector,
    cell: Selector,
    value: Selector,
}

impl ResultExtractor {
    #[must_use]
    pub fn new() -> Self {
        // Static selectors; parse failure would be a programming error
        let parse = |s: &str| Selector::parse(s).expect("valid CSS selector");
        Self {
            table: parse("table"),
            semester_header: parse("tr.info"),
            subject_header: parse("tr.thcolor"),
            row: parse("tr"),
            cell: parse("td"),
            value: parse("p"),
        }
    }

    /// Extract a student record from raw result-page markup
    ///
    /// Tolerates arbitrary input: empty, truncated, or structurally
    /// unrelated documents come back as an `ExtractError`, never a panic.
    /// Extraction is idempotent over the same markup.
    ///
    /// # Errors
    ///
    /// Every variant means "no data for this roll":
    /// - `TooFewTables` if the document has fewer than two tables
    /// - `IdentityFieldMissing` if a roll/name/father label has no value
    /// - `NoSemesters` if no semester block was found
    pub fn extract(&self, html: &str) -> Result<StudentRecord, ExtractError> {
        let document = Html::parse_document(html);
        let tables: Vec<ElementRef> = document.select(&self.table).collect();

        if tables.len() < 2 {
            return Err(ExtractError::TooFewTables);
        }

        // Identity block: table index 1, label paragraph immediately
        // followed by value paragraph
        let paragraphs: Vec<ElementRef> = tables[1].select(&self.value).collect();
        let roll_number = Self::labelled_value(&paragraphs, ROLL_LABEL)
            .ok_or(ExtractError::IdentityFieldMissing(ROLL_LABEL))?;
        let student_name = Self::labelled_value(&paragraphs, NAME_LABEL)
            .ok_or(ExtractError::IdentityFieldMissing(NAME_LABEL))?;
        let father_name = Self::labelled_value(&paragraphs, FATHER_LABEL)
            .ok_or(ExtractError::IdentityFieldMissing(FATHER_LABEL))?;

        // Semester blocks: forward pass with incremental accumulation,
        // flushed on the next boundary or at end of document
        let mut semesters: Vec<SemesterRecord> = Vec::new();
        let mut current: Option<SemesterRecord> = None;

        for table in &tables[2..] {
            if let Some(header) = table.select(&self.semester_header).next() {
                if let Some(done) = current.take() {
                    semesters.push(done);
                }
                current = Some(SemesterRecord::new(Self::semester_label(header)));
            }

            if table.select(&self.subject_header).next().is_some() {
                self.collect_subjects(*table, &mut current);
            }

            if table.html().contains(SUMMARY_MARKER) {
                // A summary with no semester to attach to is dropped
                if let Some(sem) = current.as_mut() {
                    let cells: Vec<ElementRef> = table.select(&self.cell).collect();
                    if cells.len() >= SUMMARY_CELLS {
                        sem.summary = self.read_summary(&cells);
                    }
                }
            }
        }

        if let Some(done) = current.take() {
            semesters.push(done);
        }

        if semesters.is_empty() {
            return Err(ExtractError::NoSemesters);
        }

        Ok(StudentRecord {
            roll_number,
            student_name,
            father_name,
            semesters,
        })
    }

    /// Read qualifying subject rows of a `tr.thcolor` table into the
    /// current semester
    ///
    /// The header row is skipped. A row qualifies only with at least six
    /// cells and a non-blank first cell (blank first cells are spacer rows
    /// in the portal template). Rows seen before any semester boundary have
    /// nowhere to go and are dropped.
    fn collect_subjects(&self, table: ElementRef, current: &mut Option<SemesterRecord>) {
        for row in table.select(&self.row).skip(1) {
            let cells: Vec<ElementRef> = row.select(&self.cell).collect();
            if cells.len() < SUBJECT_CELLS {
                continue;
            }

            let sno = Self::cell_text(&cells[0]);
            if sno.is_empty() {
                continue;
            }

            if let Some(sem) = current.as_mut() {
                sem.subjects.push(SubjectRecord {
                    sno,
                    subject_name: Self::cell_text(&cells[1]),
                    subject_code: Self::cell_text(&cells[2]),
                    credits: Self::cell_text(&cells[3]),
                    grade: Self::cell_text(&cells[4]),
                    grade_points: Self::cell_text(&cells[5]),
                });
            }
        }
    }

    /// Read the four summary values from cells 1-4, all-or-nothing
    ///
    /// Each value is the second paragraph of its cell (the first holds the
    /// column caption). Any malformed cell leaves the semester without a
    /// summary rather than attaching a partial one.
    fn read_summary(&self, cells: &[ElementRef]) -> Option<SummaryRecord> {
        let mut values = Vec::with_capacity(4);
        for cell in &cells[1..SUMMARY_CELLS] {
            let paragraphs: Vec<ElementRef> = cell.select(&self.value).collect();
            let value = paragraphs.get(1)?;
            values.push(Self::cell_text(value));
        }

        let mut values = values.into_iter();
        Some(SummaryRecord {
            sgpi: values.next()?,
            sgpi_total: values.next()?,
            cgpi: values.next()?,
            cgpi_total: values.next()?,
        })
    }

    /// Locate a label paragraph by text match and read the next paragraph
    /// as its value
    fn labelled_value(paragraphs: &[ElementRef], label: &str) -> Option<String> {
        let idx = paragraphs
            .iter()
            .position(|p| p.text().collect::<String>().contains(label))?;
        let value = paragraphs.get(idx + 1)?;
        Some(Self::cell_text(value))
    }

    /// Semester label: trimmed text after the last colon of the header row
    fn semester_label(header: ElementRef) -> String {
        let text = header.text().collect::<String>();
        clean_cell_text(text.trim().rsplit(':').next().unwrap_or(""))
    }

    fn cell_text(el: &ElementRef) -> String {
        clean_cell_text(&el.text().collect::<String>())
    }
}

impl Default for ResultExtractor {
    fn default() -> Self {
        Self::new()
    }
}
