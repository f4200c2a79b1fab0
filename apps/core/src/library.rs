//! Knowledge-base browsing over the document list.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Document;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentGroup {
    pub category: String,
    pub documents: Vec<Document>,
}

/// Keep documents whose name contains `query`, ignoring case
pub fn search_documents(documents: Vec<Document>, query: Option<&str>) -> Vec<Document> {
    let Some(needle) = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty()) else {
        return documents;
    };
    documents
        .into_iter()
        .filter(|d| d.name.to_lowercase().contains(&needle))
        .collect()
}

/// Groups sorted by category name; document order inside a group is kept.
pub fn group_by_category(documents: Vec<Document>) -> Vec<DocumentGroup> {
    let mut groups: BTreeMap<String, Vec<Document>> = BTreeMap::new();
    for document in documents {
        groups
            .entry(document.category.clone())
            .or_default()
            .push(document);
    }
    groups
        .into_iter()
        .map(|(category, documents)| DocumentGroup {
            category,
            documents,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(name: &str, category: &str) -> Document {
        Document {
            id: name.to_string(),
            name: name.to_string(),
            doc_type: "pdf".to_string(),
            category: category.to_string(),
            upload_date: 0,
            sections: None,
            status: "ready".to_string(),
            file_url: None,
            user_id: "demo-user".to_string(),
        }
    }

    #[test]
    fn test_search_ignores_case() {
        let docs = vec![document("CC&Rs 2019", "governing"), document("Budget", "financial")];
        let found = search_documents(docs, Some("cc&r"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "CC&Rs 2019");
    }

    #[test]
    fn test_group_by_category() {
        let docs = vec![
            document("Bylaws", "governing"),
            document("Budget", "financial"),
            document("CC&Rs", "governing"),
        ];

        let groups = group_by_category(docs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "financial");
        assert_eq!(groups[1].documents[0].name, "Bylaws");
        assert_eq!(groups[1].documents[1].name, "CC&Rs");
    }
}
