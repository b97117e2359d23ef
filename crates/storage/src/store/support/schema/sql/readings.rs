#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS readings (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          project_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
          title TEXT NOT NULL,
          author TEXT,
          nickname TEXT,
          display_order INTEGER NOT NULL DEFAULT 0,
          zotero_item_key TEXT,
          published TEXT,
          pages TEXT,
          assignment TEXT,
          level TEXT,
          classification TEXT,
          reading_notes_text TEXT,
          propositions_html TEXT,
          unity_html TEXT,
          key_terms_html TEXT,
          arguments_html TEXT,
          gaps_html TEXT,
          theories_html TEXT,
          personal_dialogue_html TEXT,
          elevator_abstract_html TEXT,
          unity_kind_of_work TEXT,
          unity_driving_question_id INTEGER REFERENCES reading_driving_questions(id) ON DELETE SET NULL
        );

        -- Outline tree per reading; a section may double as a structural part.
        CREATE TABLE IF NOT EXISTS reading_outline (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          reading_id INTEGER NOT NULL REFERENCES readings(id) ON DELETE CASCADE,
          parent_id INTEGER REFERENCES reading_outline(id) ON DELETE CASCADE,
          section_title TEXT NOT NULL,
          notes_html TEXT,
          display_order INTEGER NOT NULL DEFAULT 0,
          part_function_text_plain TEXT,
          part_relation_text_plain TEXT,
          part_dependency_text_plain TEXT,
          part_is_structural INTEGER NOT NULL DEFAULT 0,
          part_dq_id INTEGER REFERENCES reading_driving_questions(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS reading_attachments (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          reading_id INTEGER NOT NULL REFERENCES readings(id) ON DELETE CASCADE,
          display_name TEXT NOT NULL,
          file_path TEXT NOT NULL,
          display_order INTEGER NOT NULL DEFAULT 0
        );
"#;
