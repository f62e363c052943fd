/// Build the metadata extraction prompt for one syllabus.
///
/// `file_name` is echoed back verbatim; the caller still overwrites whatever
/// the model returns for it.
pub fn build_extraction_prompt(file_name: &str, document_text: &str) -> String {
    format!(
        r#"You are assisting faculty with a syllabus audit. Read the syllabus below and extract the following.

1. Course code and course name.
   Split the document title into its code and its name.
   Example: the title "CEL 100 Great Ideas Politics & Ethics" gives
   course code "CEL 100" and course name "Great Ideas Politics & Ethics".

2. Lead instructor.
   The name of the main or lead instructor.

3. "Gold Statement" and "Learning Outcomes" sections.
   Copy the FULL text of each section. Do not summarize, do not answer yes/no.
   If a section is absent, use "NA".

Answer with a single JSON object and nothing else, using exactly these keys:
- "file_name": exactly "{file_name}". Do not take a file name from the document.
- "full_title": the course title as written in the document
- "course_code": the course code, or "NA"
- "course_name": the course name, or "NA"
- "instructor_name": the lead instructor, or "NA"
- "gold_statement": full Gold Statement text, or "NA"
- "learning_outcome": full Learning Outcomes text, or "NA"

Example:
{{
  "file_name": "{file_name}",
  "full_title": "CEL 100 Great Ideas Politics & Ethics",
  "course_code": "CEL 100",
  "course_name": "Great Ideas Politics & Ethics",
  "instructor_name": "Dr. Jane Smith",
  "gold_statement": "This course fulfills the General Studies requirement for Humanities, Arts and Design by examining classic texts on politics and ethics.",
  "learning_outcome": "Students will analyze political theories and apply ethical frameworks to contemporary issues."
}}

No commentary, no code fences. JSON only.

<document name="{file_name}">
{document_text}
</document>
"#
    )
}

/// Build the LLM-as-judge prompt comparing a syllabus Gold Statement with the
/// official statement for its designation area.
pub fn build_judge_prompt(
    gold_designation: &str,
    expected_statement: &str,
    syllabus_statement: &str,
) -> String {
    format!(
        r#"You are an impartial evaluator of academic course statements. Decide whether a syllabus Gold Statement matches the official statement required for its General Studies Gold designation area.

Rules:
- Compare the syllabus statement against the official statement closely.
- Judge on the text itself; ignore bullet characters and list formatting.
- Answer with one JSON object: "match" is "yes" or "no", "reason" is a short justification.

Gold designation area: {gold_designation}

Official expected statement:
{expected_statement}

Syllabus Gold Statement:
{syllabus_statement}

JSON only:
{{"match": "yes|no", "reason": "..."}}
"#
    )
}
