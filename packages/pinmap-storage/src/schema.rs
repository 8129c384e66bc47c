pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_users.sql")),
				"tables/002_places.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_places.sql")),
				"tables/003_place_lists.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_place_lists.sql")),
				"tables/004_list_places.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_list_places.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
