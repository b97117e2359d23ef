#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        -- Project / class / folder hierarchy.
        CREATE TABLE IF NOT EXISTS items (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          parent_id INTEGER REFERENCES items(id) ON DELETE CASCADE,
          type TEXT NOT NULL,
          name TEXT NOT NULL,
          display_order INTEGER NOT NULL DEFAULT 0,
          is_assignment INTEGER NOT NULL DEFAULT 0,
          project_purpose_text TEXT,
          project_goals_text TEXT,
          key_questions_text TEXT,
          thesis_text TEXT,
          insights_text TEXT,
          unresolved_text TEXT,
          assignment_instructions_text TEXT,
          assignment_draft_text TEXT,
          synthesis_notes_html TEXT
        );

        CREATE TABLE IF NOT EXISTS instructions (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          project_id INTEGER NOT NULL UNIQUE REFERENCES items(id) ON DELETE CASCADE,
          key_questions_instr TEXT NOT NULL DEFAULT '',
          thesis_instr TEXT NOT NULL DEFAULT '',
          insights_instr TEXT NOT NULL DEFAULT '',
          unresolved_instr TEXT NOT NULL DEFAULT '',
          synthesis_terminology_instr TEXT NOT NULL DEFAULT '',
          synthesis_propositions_instr TEXT NOT NULL DEFAULT '',
          synthesis_notes_instr TEXT NOT NULL DEFAULT '',
          reading_dq_instr TEXT NOT NULL DEFAULT '',
          reading_lp_instr TEXT NOT NULL DEFAULT '',
          reading_unity_instr TEXT NOT NULL DEFAULT '',
          reading_elevator_instr TEXT NOT NULL DEFAULT '',
          reading_parts_instr TEXT NOT NULL DEFAULT '',
          reading_key_terms_instr TEXT NOT NULL DEFAULT '',
          reading_arguments_instr TEXT NOT NULL DEFAULT '',
          reading_gaps_instr TEXT NOT NULL DEFAULT '',
          reading_theories_instr TEXT NOT NULL DEFAULT '',
          reading_dialogue_instr TEXT NOT NULL DEFAULT '',
          reading_rules_html TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS rubric_components (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          project_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
          component_text TEXT NOT NULL,
          is_checked INTEGER NOT NULL DEFAULT 0,
          display_order INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS project_todo_list (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          project_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
          display_name TEXT NOT NULL,
          task_html TEXT,
          notes_html TEXT,
          is_checked INTEGER NOT NULL DEFAULT 0,
          display_order INTEGER NOT NULL DEFAULT 0
        );
"#;
