#[cfg(test)]
mod tests {
    use crate::concept::{AttributeValue, BaseType, ConceptInfo, DataType};
    use crate::error::GraphError;
    use crate::graph::{KnowledgeGraph, RolePlayer};
    use arrow::record_batch::RecordBatch;
    use arrow::array::{ArrayRef, StringArray};
    use arrow::datatypes::{DataType as ArrowDataType, Field, Schema};
    use std::sync::Arc;

    fn create_test_concepts() -> RecordBatch {
        let ids = StringArray::from(vec!["P1", "P2", "E1", "N1"]);
        let type_labels = StringArray::from(vec!["person", "company", "employment", "name"]);
        let base_types = StringArray::from(vec!["entity", "entity", "relation", "attribute"]);
        let data_types = StringArray::from(vec![None, None, None, Some("string")]);
        let values = StringArray::from(vec![None, None, None, Some("Sundar Pichai")]);

        RecordBatch::try_new(
            KnowledgeGraph::concepts_schema(),
            vec![
                Arc::new(ids) as ArrayRef,
                Arc::new(type_labels) as ArrayRef,
                Arc::new(base_types) as ArrayRef,
                Arc::new(data_types) as ArrayRef,
                Arc::new(values) as ArrayRef,
            ],
        ).unwrap()
    }

    fn create_test_role_players(rows: &[(&str, &str, &str)]) -> RecordBatch {
        let relationship_ids = StringArray::from(rows.iter().map(|r| r.0).collect::<Vec<_>>());
        let role_labels = StringArray::from(rows.iter().map(|r| r.1).collect::<Vec<_>>());
        let player_ids = StringArray::from(rows.iter().map(|r| r.2).collect::<Vec<_>>());

        RecordBatch::try_new(
            KnowledgeGraph::role_players_schema(),
            vec![
                Arc::new(relationship_ids) as ArrayRef,
                Arc::new(role_labels) as ArrayRef,
                Arc::new(player_ids) as ArrayRef,
            ],
        ).unwrap()
    }

    fn create_test_graph() -> KnowledgeGraph {
        let role_players = create_test_role_players(&[
            ("E1", "employee", "P1"),
            ("E1", "employer", "P2"),
        ]);
        KnowledgeGraph::new(create_test_concepts(), role_players).unwrap()
    }

    #[test]
    fn test_graph_creation() {
        let graph = create_test_graph();

        assert_eq!(graph.concept_count(), 4);
        assert_eq!(graph.role_player_count(), 2);

        assert!(graph.has_concept("P1"));
        assert!(graph.has_concept("E1"));
        assert!(!graph.has_concept("X"));

        let employment = graph.concept("E1").unwrap();
        assert_eq!(employment.base_type, BaseType::Relationship);

        let name = graph.concept("N1").unwrap();
        assert_eq!(name.data_type, Some(DataType::String));
        assert_eq!(name.value, Some(AttributeValue::String("Sundar Pichai".into())));
    }

    #[test]
    fn test_role_indexes_keep_row_order() {
        let graph = create_test_graph();

        assert_eq!(
            graph.roles_played("P1"),
            &[("employee".to_string(), "E1".to_string())]
        );
        assert_eq!(
            graph.roleplayers("E1"),
            &[
                ("employee".to_string(), "P1".to_string()),
                ("employer".to_string(), "P2".to_string()),
            ]
        );
        assert!(graph.roles_played("N1").is_empty());
        assert!(graph.roleplayers("P1").is_empty());
    }

    #[test]
    fn test_unknown_player_is_rejected() {
        let role_players = create_test_role_players(&[("E1", "employee", "P9")]);
        let err = KnowledgeGraph::new(create_test_concepts(), role_players).unwrap_err();
        assert!(matches!(err, GraphError::ConceptNotFound(id) if id == "P9"));
    }

    #[test]
    fn test_role_players_need_a_relationship() {
        let role_players = create_test_role_players(&[("P2", "employee", "P1")]);
        let err = KnowledgeGraph::new(create_test_concepts(), role_players).unwrap_err();
        assert!(matches!(err, GraphError::GraphConstruction(_)));
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let role_players = create_test_role_players(&[]);
        let concepts = create_test_concepts().project(&[0, 1]).unwrap();
        let err = KnowledgeGraph::new(concepts, role_players).unwrap_err();
        assert!(matches!(err, GraphError::GraphConstruction(msg) if msg.contains("base_type")));
    }

    /// One-row concept batch whose columns all accept nulls
    fn single_concept(id: Option<&str>, data_type: Option<&str>, value: Option<&str>) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", ArrowDataType::Utf8, true),
            Field::new("type_label", ArrowDataType::Utf8, true),
            Field::new("base_type", ArrowDataType::Utf8, true),
            Field::new("data_type", ArrowDataType::Utf8, true),
            Field::new("value", ArrowDataType::Utf8, true),
        ]));

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![id])) as ArrayRef,
                Arc::new(StringArray::from(vec![Some("age")])) as ArrayRef,
                Arc::new(StringArray::from(vec![Some("attribute")])) as ArrayRef,
                Arc::new(StringArray::from(vec![data_type])) as ArrayRef,
                Arc::new(StringArray::from(vec![value])) as ArrayRef,
            ],
        ).unwrap()
    }

    #[test]
    fn test_typed_value_is_parsed() {
        let concepts = single_concept(Some("A1"), Some("long"), Some("42"));
        let graph = KnowledgeGraph::new(concepts, create_test_role_players(&[])).unwrap();
        assert_eq!(graph.concept("A1").unwrap().value, Some(AttributeValue::Long(42)));
    }

    #[test]
    fn test_unparsable_value_is_rejected() {
        let concepts = single_concept(Some("A1"), Some("long"), Some("forty"));
        let err = KnowledgeGraph::new(concepts, create_test_role_players(&[])).unwrap_err();
        assert!(matches!(err, GraphError::GraphConstruction(msg) if msg.contains("forty")));
    }

    #[test]
    fn test_value_needs_a_data_type() {
        let concepts = single_concept(Some("A1"), None, Some("42"));
        let err = KnowledgeGraph::new(concepts, create_test_role_players(&[])).unwrap_err();
        assert!(matches!(err, GraphError::GraphConstruction(msg) if msg.contains("A1")));

        let concepts = single_concept(Some("A1"), Some("long"), None);
        let err = KnowledgeGraph::new(concepts, create_test_role_players(&[])).unwrap_err();
        assert!(matches!(err, GraphError::GraphConstruction(_)));
    }

    #[test]
    fn test_null_in_required_column_is_rejected() {
        let concepts = single_concept(None, Some("long"), Some("42"));
        let err = KnowledgeGraph::new(concepts, create_test_role_players(&[])).unwrap_err();
        assert!(matches!(err, GraphError::GraphConstruction(msg) if msg.contains("'id'")));
    }

    #[test]
    fn test_builder_matches_batches() {
        let graph = KnowledgeGraph::builder()
            .entity("P1", "person")
            .entity("P2", "company")
            .relationship("E1", "employment")
            .concept(ConceptInfo::attribute("N1", "name", AttributeValue::String("Sundar Pichai".into())))
            .role_player("E1", "employee", "P1")
            .role_player("E1", "employer", "P2")
            .build()
            .unwrap();

        let expected = create_test_graph();
        assert_eq!(graph.to_document().unwrap(), expected.to_document().unwrap());
        assert_eq!(graph.type_labels(), vec!["person", "company", "employment", "name"]);
        assert_eq!(graph.role_labels(), vec!["employee", "employer"]);
    }

    #[test]
    fn test_json_document_round_trip() {
        let graph = create_test_graph();
        let json = graph.to_json_string().unwrap();
        let reloaded = KnowledgeGraph::from_json_str(&json).unwrap();

        let document = reloaded.to_document().unwrap();
        assert_eq!(document.concepts.len(), 4);
        assert_eq!(document.role_players[1], RolePlayer::new("E1", "employer", "P2"));
        assert_eq!(document, graph.to_document().unwrap());
    }

    #[tokio::test]
    async fn test_json_file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, create_test_graph().to_json_string().unwrap()).unwrap();

        let graph = KnowledgeGraph::from_json_file(&path).await.unwrap();
        assert_eq!(graph.concepts_of_type("person").count(), 1);
    }
}
