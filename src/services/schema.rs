use serde_json::{Value, json};

/// Response schema the generation service must conform its JSON to.
pub fn ebook_schema() -> Value {
    let string = json!({ "type": "STRING" });
    let string_list = json!({ "type": "ARRAY", "items": string });

    json!({
        "type": "OBJECT",
        "properties": {
            "ebook": {
                "type": "OBJECT",
                "properties": {
                    "cover_page": {
                        "type": "OBJECT",
                        "properties": {
                            "title": string,
                            "subtitle": string,
                            "author": string
                        },
                        "required": ["title", "subtitle", "author"]
                    },
                    "copyright_page": {
                        "type": "OBJECT",
                        "properties": {
                            "copyright_notice": string,
                            "disclaimer": string,
                            "website_or_contact": string
                        },
                        "required": ["copyright_notice", "disclaimer", "website_or_contact"]
                    },
                    "table_of_contents": {
                        "type": "OBJECT",
                        "properties": {
                            "chapters": string_list
                        },
                        "required": ["chapters"]
                    }
                },
                "required": ["cover_page", "copyright_page", "table_of_contents"]
            },
            "chapters": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "chapter_title": string,
                        "overview": string,
                        "key_concepts": string_list,
                        "practical_sections": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "section_title": string,
                                    "explanation": string,
                                    "example": string,
                                    "action_steps": string_list
                                },
                                "required": ["section_title", "explanation", "example", "action_steps"]
                            }
                        },
                        "case_study": string,
                        "checklist": string_list,
                        "summary": string
                    },
                    "required": [
                        "chapter_title",
                        "overview",
                        "key_concepts",
                        "practical_sections",
                        "case_study",
                        "checklist",
                        "summary"
                    ]
                }
            }
        },
        "required": ["ebook", "chapters"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(node: &Value) -> Vec<&str> {
        node["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn root_requires_ebook_and_chapters() {
        let schema = ebook_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(required(&schema), vec!["ebook", "chapters"]);
        assert_eq!(schema["properties"]["chapters"]["type"], "ARRAY");
    }

    #[test]
    fn chapter_items_require_every_field() {
        let schema = ebook_schema();
        let chapter = &schema["properties"]["chapters"]["items"];
        assert_eq!(required(chapter).len(), 7);
        for field in required(chapter) {
            assert!(chapter["properties"].get(field).is_some(), "{field} has no property");
        }

        let section = &chapter["properties"]["practical_sections"]["items"];
        assert_eq!(
            required(section),
            vec!["section_title", "explanation", "example", "action_steps"]
        );
        assert_eq!(section["properties"]["action_steps"]["items"]["type"], "STRING");
    }

    #[test]
    fn metadata_pages_are_required() {
        let schema = ebook_schema();
        let ebook = &schema["properties"]["ebook"];
        assert_eq!(
            required(ebook),
            vec!["cover_page", "copyright_page", "table_of_contents"]
        );
        assert_eq!(
            required(&ebook["properties"]["copyright_page"]),
            vec!["copyright_notice", "disclaimer", "website_or_contact"]
        );
    }
}
