#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        -- Shared table for driving questions, key terms, propositions, theories and arguments.
        -- `type` is NULL or a free label for driving questions, a reserved value otherwise.
        CREATE TABLE IF NOT EXISTS reading_driving_questions (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          reading_id INTEGER NOT NULL REFERENCES readings(id) ON DELETE CASCADE,
          parent_id INTEGER REFERENCES reading_driving_questions(id) ON DELETE CASCADE,
          display_order INTEGER NOT NULL DEFAULT 0,
          type TEXT,
          question_text TEXT,
          nickname TEXT,
          question_category TEXT,
          scope TEXT,
          outline_id INTEGER REFERENCES reading_outline(id) ON DELETE SET NULL,
          pages TEXT,
          why_question TEXT,
          is_working_question INTEGER NOT NULL DEFAULT 0,
          extra_notes_text TEXT,
          because_text TEXT,
          linked_question_id INTEGER REFERENCES reading_driving_questions(id) ON DELETE SET NULL,
          is_insight INTEGER NOT NULL DEFAULT 0,
          synthesis_tags TEXT
        );

        CREATE TABLE IF NOT EXISTS argument_evidence (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          argument_id INTEGER NOT NULL REFERENCES reading_driving_questions(id) ON DELETE CASCADE,
          display_order INTEGER NOT NULL DEFAULT 0,
          outline_id INTEGER REFERENCES reading_outline(id) ON DELETE SET NULL,
          pages_text TEXT,
          argument_text TEXT,
          reading_text TEXT,
          role_in_argument TEXT,
          evidence_type TEXT,
          status TEXT,
          rationale_text TEXT
        );
"#;
