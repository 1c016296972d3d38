use reflow::dom::ColumnSpec;
use reflow::{
    ClickAction, MemoryHost, OrderStrategy, ReflowConfig, ReflowError, TranspositionEngine,
    ViewHost,
};

fn five_columns(parent_width: u32) -> MemoryHost {
    MemoryHost::generated(
        parent_width,
        vec![
            ColumnSpec::new("Name", 100),
            ColumnSpec::new("Email", 150),
            ColumnSpec::new("Phone", 150),
            ColumnSpec::new("City", 200),
            ColumnSpec::new("Notes", 300),
        ],
        3,
    )
}

fn aux_contents(host: &MemoryHost, row: usize) -> Vec<usize> {
    let aux = host.auxiliary_row(row).unwrap();
    host.children(aux)
        .iter()
        .map(|cell| host.column_of_cell(*cell).unwrap())
        .collect()
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_arbitrary_order_keeps_column_order() {
    let mut host = five_columns(1000);
    let config = ReflowConfig::default().order_strategy(OrderStrategy::Arbitrary);
    let mut engine = TranspositionEngine::mount(&mut host, config).unwrap();

    engine.transpose_column(&mut host, 2).unwrap();
    engine.transpose_column(&mut host, 4).unwrap();
    engine.transpose_column(&mut host, 3).unwrap();

    for row in 0..3 {
        assert_eq!(aux_contents(&host, row), vec![2, 3, 4]);
    }
}

#[test]
fn test_backwards_order_always_inserts_first() {
    let mut host = five_columns(1000);
    let mut engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();

    engine.transpose_column(&mut host, 2).unwrap();
    engine.transpose_column(&mut host, 4).unwrap();
    engine.transpose_column(&mut host, 3).unwrap();

    // Only correct for right-to-left collapse; out of order it shows.
    assert_eq!(aux_contents(&host, 0), vec![3, 4, 2]);
}

#[test]
fn test_backwards_order_matches_column_order_when_shrinking() {
    let mut host = five_columns(1000);
    let mut engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();

    host.resize_parent(150);
    engine.handle_resize(&mut host).unwrap();

    assert_eq!(aux_contents(&host, 1), vec![2, 3, 4]);
    assert_eq!(
        engine.auxiliary_rows()[1].shown_columns(),
        vec![2, 3, 4]
    );
}

#[test]
fn test_restored_column_leaves_auxiliary_rows() {
    let mut host = five_columns(1000);
    let config = ReflowConfig::default().order_strategy(OrderStrategy::Arbitrary);
    let mut engine = TranspositionEngine::mount(&mut host, config).unwrap();

    engine.transpose_column(&mut host, 2).unwrap();
    engine.transpose_column(&mut host, 3).unwrap();
    engine.transpose_column(&mut host, 2).unwrap();

    assert_eq!(aux_contents(&host, 0), vec![3]);
    assert_eq!(host.parent_of(host.cell(0, 2).unwrap()), host.slot(0, 2));
    assert_eq!(engine.auxiliary_rows()[0].shown_columns(), vec![3]);
}

#[test]
fn test_auxiliary_rows_kept_while_content_remains() {
    let mut host = five_columns(1000);
    let mut engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();

    engine.transpose_column(&mut host, 2).unwrap();
    engine.transpose_column(&mut host, 4).unwrap();
    // Restoring the outermost column while column 2 still lives in the
    // auxiliary rows must not destroy them.
    engine.transpose_column(&mut host, 4).unwrap();

    assert_eq!(host.auxiliary_row_count(), 3);
    assert_eq!(aux_contents(&host, 0), vec![2]);
}

#[test]
fn test_auxiliary_row_follows_its_row() {
    let mut host = five_columns(1000);
    let mut engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();

    engine.transpose_column(&mut host, 4).unwrap();

    let table = host.table().unwrap();
    let children = host.children(table);
    for row in 0..3 {
        let original = children.iter().position(|&c| c == host.rows()[row]).unwrap();
        assert_eq!(children[original + 1], host.auxiliary_row(row).unwrap());
    }
}

// ============================================================================
// Row toggling
// ============================================================================

#[test]
fn test_toggle_row_swaps_visibility_and_indicator_style() {
    let mut host = five_columns(1000);
    let mut engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();
    engine.transpose_column(&mut host, 4).unwrap();

    let aux = host.auxiliary_row(1).unwrap();
    let caret = engine.indicators().get(1).unwrap().element;

    assert!(engine.toggle_row(&mut host, 1).unwrap());
    assert!(host.is_visible(aux));
    assert!(host.has_class(caret, "fa-toggle-down"));
    assert!(!host.has_class(caret, "fa-toggle-right"));

    assert!(!engine.toggle_row(&mut host, 1).unwrap());
    assert!(!host.is_visible(aux));
    assert!(host.has_class(caret, "fa-toggle-right"));
    assert!(!host.has_class(caret, "fa-toggle-down"));
}

#[test]
fn test_toggle_only_touches_its_own_row() {
    let mut host = five_columns(1000);
    let mut engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();
    engine.transpose_column(&mut host, 4).unwrap();

    engine.toggle_row(&mut host, 0).unwrap();

    assert!(host.is_visible(host.auxiliary_row(0).unwrap()));
    assert!(!host.is_visible(host.auxiliary_row(1).unwrap()));
    assert!(!host.is_visible(host.auxiliary_row(2).unwrap()));
    assert!(engine.auxiliary_rows()[0].is_visible());
}

#[test]
fn test_click_on_indicator_toggles_row() {
    let mut host = five_columns(1000);
    let mut engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();
    engine.transpose_column(&mut host, 4).unwrap();

    let caret = engine.indicators().get(2).unwrap().element;
    assert_eq!(
        host.click_action(caret),
        Some(ClickAction::ToggleAuxiliaryRow { row: 2 })
    );

    assert_eq!(engine.click(&mut host, caret).unwrap(), Some(true));
    assert_eq!(engine.click(&mut host, caret).unwrap(), Some(false));

    let header = host.headers()[0];
    assert_eq!(engine.click(&mut host, header).unwrap(), None);
}

#[test]
fn test_click_action_routes_to_row() {
    let mut host = five_columns(1000);
    let mut engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();
    engine.transpose_column(&mut host, 4).unwrap();

    let caret = engine.indicators().get(0).unwrap().element;
    let action = host.click_action(caret).unwrap();

    assert!(engine.handle_click_action(&mut host, action).unwrap());
    assert!(host.is_visible(host.auxiliary_row(0).unwrap()));
}

#[test]
fn test_toggle_without_auxiliary_rows_fails() {
    let mut host = five_columns(1000);
    let mut engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();

    let err = engine.toggle_row(&mut host, 0).unwrap_err();
    assert!(matches!(err, ReflowError::NoAuxiliaryRow { row: 0 }));
}

// ============================================================================
// Indicators
// ============================================================================

#[test]
fn test_indicators_sit_first_in_first_cell() {
    let mut host = five_columns(1000);
    let engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();

    assert_eq!(engine.indicators().len(), 3);
    for indicator in engine.indicators().iter() {
        let cell = host.cell(indicator.row, 0).unwrap();
        assert_eq!(indicator.cell, cell);
        assert_eq!(host.children(cell)[0], indicator.element);
        assert!(!host.is_visible(indicator.element));
        assert!(host.has_class(indicator.element, "fa-toggle-right"));
    }
}

#[test]
fn test_indicators_follow_transposition_state() {
    let mut host = five_columns(1000);
    let mut engine = TranspositionEngine::mount(&mut host, ReflowConfig::default()).unwrap();
    let caret = engine.indicators().get(0).unwrap().element;

    host.resize_parent(500);
    engine.handle_resize(&mut host).unwrap();
    assert!(host.is_visible(caret));

    engine.toggle_row(&mut host, 0).unwrap();
    assert!(host.has_class(caret, "fa-toggle-down"));

    host.resize_parent(1000);
    engine.handle_resize(&mut host).unwrap();
    assert!(!host.is_visible(caret));

    // Coming back transposed, every row starts collapsed again.
    host.resize_parent(500);
    engine.handle_resize(&mut host).unwrap();
    assert!(host.is_visible(caret));
    assert!(host.has_class(caret, "fa-toggle-right"));
    assert!(!host.has_class(caret, "fa-toggle-down"));
    assert!(!host.is_visible(host.auxiliary_row(0).unwrap()));
}

#[test]
fn test_custom_indicator_styles() {
    let mut host = five_columns(1000);
    let config = ReflowConfig::default().indicator_styles("closed", "open");
    let mut engine = TranspositionEngine::mount(&mut host, config).unwrap();
    engine.transpose_column(&mut host, 4).unwrap();
    let caret = engine.indicators().get(0).unwrap().element;

    assert!(host.has_class(caret, "closed"));
    engine.toggle_row(&mut host, 0).unwrap();
    assert!(host.has_class(caret, "open"));
    assert!(!host.has_class(caret, "closed"));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_transposed_table() {
    let mut host = MemoryHost::with_table(
        19,
        vec![
            ColumnSpec::new("Name", 6),
            ColumnSpec::new("Age", 5),
            ColumnSpec::new("City", 8),
        ],
        vec![
            vec!["Ann", "31", "Oslo"],
            vec!["Bob", "42", "Rome"],
            vec!["Cy", "7", "Lima"],
        ],
    );
    let config = ReflowConfig::default().width_margin(0);
    let mut engine = TranspositionEngine::mount(&mut host, config).unwrap();

    assert_eq!(
        host.render_lines("fa-toggle-down"),
        vec!["Name  Age  City", "Ann   31   Oslo", "Bob   42   Rome", "Cy    7    Lima"]
    );

    host.resize_parent(15);
    engine.handle_resize(&mut host).unwrap();
    engine.toggle_row(&mut host, 0).unwrap();

    assert_eq!(
        host.render_lines("fa-toggle-down"),
        vec![
            "Name  Age",
            "▾ Ann 31",
            "    City: Oslo",
            "▸ Bob 42",
            "▸ Cy  7",
        ]
    );
}

#[test]
fn test_render_counts_indicator_and_wide_characters() {
    let mut host = MemoryHost::with_table(
        15,
        vec![
            ColumnSpec::new("Nm", 5),
            ColumnSpec::new("Age", 4),
            ColumnSpec::new("City", 6),
        ],
        vec![
            vec!["Anna", "31", "東京"],
            vec!["Bo", "42", "Rome"],
            vec!["Cy", "7", "Lima"],
        ],
    );
    let config = ReflowConfig::default().width_margin(0);
    let mut engine = TranspositionEngine::mount(&mut host, config).unwrap();

    assert_eq!(
        host.render_lines("fa-toggle-down"),
        vec!["Nm   Age City", "Anna 31  東京", "Bo   42  Rome", "Cy   7   Lima"]
    );

    host.resize_parent(10);
    engine.handle_resize(&mut host).unwrap();
    engine.toggle_row(&mut host, 0).unwrap();

    // "▾ Anna" is six columns wide, so column 0 widens and "Age" follows it.
    assert_eq!(
        host.render_lines("fa-toggle-down"),
        vec![
            "Nm    Age",
            "▾ Anna31",
            "    City: 東京",
            "▸ Bo  42",
            "▸ Cy  7",
        ]
    );
}
