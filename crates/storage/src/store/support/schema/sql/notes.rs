#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        -- Project-level terminology and propositions, each tracked against every reading.
        CREATE TABLE IF NOT EXISTS project_terminology (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          project_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
          term TEXT NOT NULL,
          meaning TEXT,
          display_order INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS terminology_reading_links (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          terminology_id INTEGER NOT NULL REFERENCES project_terminology(id) ON DELETE CASCADE,
          reading_id INTEGER NOT NULL REFERENCES readings(id) ON DELETE CASCADE,
          not_in_reading INTEGER NOT NULL DEFAULT 0,
          UNIQUE (terminology_id, reading_id)
        );

        CREATE TABLE IF NOT EXISTS terminology_references (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          terminology_id INTEGER NOT NULL REFERENCES project_terminology(id) ON DELETE CASCADE,
          reading_id INTEGER NOT NULL REFERENCES readings(id) ON DELETE CASCADE,
          outline_id INTEGER REFERENCES reading_outline(id) ON DELETE SET NULL,
          page_number TEXT,
          author_address TEXT,
          notes TEXT
        );

        CREATE TABLE IF NOT EXISTS project_propositions (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          project_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
          display_name TEXT NOT NULL,
          proposition_html TEXT,
          display_order INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS proposition_reading_links (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          proposition_id INTEGER NOT NULL REFERENCES project_propositions(id) ON DELETE CASCADE,
          reading_id INTEGER NOT NULL REFERENCES readings(id) ON DELETE CASCADE,
          not_in_reading INTEGER NOT NULL DEFAULT 0,
          UNIQUE (proposition_id, reading_id)
        );

        CREATE TABLE IF NOT EXISTS proposition_references (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          proposition_id INTEGER NOT NULL REFERENCES project_propositions(id) ON DELETE CASCADE,
          reading_id INTEGER NOT NULL REFERENCES readings(id) ON DELETE CASCADE,
          outline_id INTEGER REFERENCES reading_outline(id) ON DELETE SET NULL,
          page_number TEXT,
          how_addressed TEXT,
          notes TEXT
        );
"#;
