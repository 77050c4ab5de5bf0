use diagram_converter::error::ErrorKind;
use diagram_converter::layout::{self, LayoutContext, LayoutMode, RenderableClass};
use diagram_converter::parse::{self, Coordinate, ProcessSchema, Role};
use diagram_converter::source::{Database, MemoryDatabase};

mod helpers;

fn build(xml: &str, db: &MemoryDatabase, pathway: i64, mode: LayoutMode) -> layout::Diagram {
    try_build(xml, db, pathway, mode).unwrap()
}

fn try_build(
    xml: &str,
    db: &MemoryDatabase,
    pathway: i64,
    mode: LayoutMode,
) -> Result<layout::Diagram, diagram_converter::error::ConvertError> {
    let process = parse::parse(xml, &ProcessSchema::builtin().unwrap()).unwrap();
    let ctx = LayoutContext {
        db_id: pathway,
        pathway: db.record(pathway).unwrap(),
        mode,
    };
    layout::build(&process, db, &ctx)
}

fn point(x: f64, y: f64) -> Coordinate {
    Coordinate { x, y }
}

#[test]
fn single_reaction_has_three_nodes_and_two_edges() {
    let db = helpers::single_reaction_db();
    let diagram = build(helpers::SINGLE_REACTION, &db, 100, LayoutMode::PathwayDiagram);

    assert_eq!(diagram.db_id, 100);
    assert_eq!(diagram.display_name, "Single step");
    assert_eq!(diagram.stable_id, "R-HSA-100");

    let ids: Vec<i64> = diagram.nodes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    let glyph = diagram.node(3).unwrap();
    assert_eq!(glyph.renderable_class, RenderableClass::ReactionGlyph);
    assert_eq!(glyph.reactome_id, 200);
    assert_eq!((glyph.min_x, glyph.min_y, glyph.max_x, glyph.max_y), (64.0, 4.0, 76.0, 16.0));

    assert_eq!(diagram.edges.len(), 2);
    let input = &diagram.edges[0];
    assert_eq!((input.id, input.role, input.source, input.target), (4, Role::Input, 1, 3));
    assert_eq!(input.points, vec![point(20.0, 10.0), point(70.0, 10.0)]);
    let output = &diagram.edges[1];
    assert_eq!((output.id, output.role, output.source, output.target), (5, Role::Output, 3, 2));
    assert_eq!(output.points, vec![point(70.0, 10.0), point(120.0, 10.0)]);

    assert_eq!(diagram.node(1).unwrap().anchors, vec![point(20.0, 10.0)]);
    assert_eq!(diagram.node(2).unwrap().anchors, vec![point(120.0, 10.0)]);
    assert!(diagram.shadows.is_empty());
    assert!(diagram.nodes.iter().all(|n| n.trivial.is_none()));
}

#[test]
fn ambiguous_node_type_comes_from_schema_class() {
    let db = helpers::single_reaction_db();
    let diagram = build(helpers::SINGLE_REACTION, &db, 100, LayoutMode::PathwayDiagram);
    let b = diagram.node(2).unwrap();
    assert_eq!(b.renderable_class, RenderableClass::Chemical);
    assert_eq!(b.schema_class.as_deref(), Some("SimpleEntity"));
    assert_eq!(b.display_name, "B");
}

#[test]
fn document_bounds_cover_every_shape() {
    let db = helpers::single_reaction_db();
    let diagram = build(helpers::SINGLE_REACTION, &db, 100, LayoutMode::PathwayDiagram);
    assert_eq!(
        (diagram.min_x, diagram.min_y, diagram.max_x, diagram.max_y),
        (0.0, 0.0, 140.0, 20.0)
    );
}

#[test]
fn polylines_are_copied_verbatim() {
    let db = helpers::shared_water_db();
    let diagram = build(helpers::SHARED_WATER, &db, 110, LayoutMode::PathwayDiagram);

    // Process ids end at 7 (the declared edge), generated edges start at 8.
    let ids: Vec<i64> = diagram.edges.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![8, 9, 10, 11, 12, 13]);

    let routed = &diagram.edges[0];
    assert_eq!(routed.points, vec![point(15.0, 10.0), point(60.0, 30.0), point(100.0, 50.0)]);
    assert_eq!(diagram.edges[1].stoichiometry, Some(2));
    assert_eq!(diagram.edges[0].stoichiometry, None);

    // Both water edges leave from its centre, so one anchor.
    assert_eq!(diagram.node(1).unwrap().anchors, vec![point(15.0, 10.0)]);
}

#[test]
fn containment_prefers_hints_over_geometry() {
    let db = helpers::compartments_db();
    let diagram = build(helpers::COMPARTMENTS, &db, 130, LayoutMode::PathwayDiagram);

    let cytosol = diagram.compartments.iter().find(|c| c.id == 10).unwrap();
    let nucleus = diagram.compartments.iter().find(|c| c.id == 11).unwrap();
    assert_eq!(cytosol.display_name, "cytosol");
    assert_eq!(cytosol.renderable_class, RenderableClass::Compartment);
    assert_eq!(cytosol.component_ids, vec![3, 11]);
    assert_eq!(nucleus.component_ids, vec![1, 2]);
    assert_eq!(diagram.max_x, 500.0);
}

const DISEASE: &str = r#"<Process>
  <Nodes>
    <Node id="1" reactomeId="300" type="Chemical" x="0" y="0" width="40" height="20"/>
    <Node id="2" reactomeId="301" type="Chemical" x="100" y="0" width="40" height="20"/>
    <Node id="4" reactomeId="302" type="Protein" x="100" y="50" width="40" height="20" disease="true"/>
  </Nodes>
  <Reactions>
    <Reaction id="3" reactomeId="200" x="70" y="10">
      <Inputs><Input id="1"/></Inputs>
      <Outputs><Output id="2"/><Output id="4"/></Outputs>
    </Reaction>
  </Reactions>
</Process>"#;

#[test]
fn pathway_diagram_mode_keeps_disease_nodes() {
    let db = helpers::single_reaction_db();
    let diagram = build(DISEASE, &db, 100, LayoutMode::PathwayDiagram);
    assert_eq!(diagram.nodes.len(), 4);
    assert_eq!(diagram.edges.len(), 3);
    assert_eq!(diagram.node(4).unwrap().disease, Some(true));
    assert_eq!(diagram.node(1).unwrap().disease, None);
    assert_eq!(diagram.is_disease, Some(true));
}

#[test]
fn pathway_mode_suppresses_disease_nodes() {
    let db = helpers::single_reaction_db();
    let diagram = build(DISEASE, &db, 100, LayoutMode::Pathway);
    assert!(diagram.node(4).is_none());
    assert_eq!(diagram.nodes.len(), 3);
    assert_eq!(diagram.edges.len(), 2);
    assert_eq!(diagram.is_disease, None);
}

#[test]
fn dangling_edge_is_inconsistent() {
    let db = helpers::single_reaction_db();
    let err = try_build(helpers::DANGLING_EDGE, &db, 100, LayoutMode::PathwayDiagram).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InconsistentProcess);
    assert_eq!(err.code, "I003");
    assert_eq!(err.reference.as_deref(), Some("99"));
}

#[test]
fn participant_without_node_is_inconsistent() {
    let xml = r#"<Process>
      <Nodes><Node id="1" reactomeId="300" type="Chemical" x="0" y="0" width="1" height="1"/></Nodes>
      <Reactions><Reaction id="3" reactomeId="200" x="5" y="5">
        <Catalysts><Catalyst id="42"/></Catalysts>
      </Reaction></Reactions>
    </Process>"#;
    let db = helpers::single_reaction_db();
    let err = try_build(xml, &db, 100, LayoutMode::PathwayDiagram).unwrap_err();
    assert_eq!(err.code, "I002");
    assert_eq!(err.reference.as_deref(), Some("42"));
}

#[test]
fn unresolvable_entity_class_is_inconsistent() {
    let xml = r#"<Process>
      <Nodes><Node id="1" reactomeId="777" x="0" y="0" width="1" height="1"/></Nodes>
    </Process>"#;
    let db = helpers::single_reaction_db();
    let err = try_build(xml, &db, 100, LayoutMode::PathwayDiagram).unwrap_err();
    assert_eq!(err.code, "I007");
    assert_eq!(err.reference.as_deref(), Some("777"));
}

#[test]
fn exhausted_id_space_is_inconsistent() {
    let xml = r#"<Process>
      <Nodes><Node id="9223372036854775807" reactomeId="300" type="Chemical" x="0" y="0" width="1" height="1"/></Nodes>
      <Reactions><Reaction id="3" reactomeId="200" x="5" y="5">
        <Inputs><Input id="9223372036854775807"/></Inputs>
      </Reaction></Reactions>
    </Process>"#;
    let db = helpers::single_reaction_db();
    let err = try_build(xml, &db, 100, LayoutMode::PathwayDiagram).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InconsistentProcess);
    assert_eq!(err.code, "I010");

    // Without edges to allocate, the highest id is still usable.
    let xml = r#"<Process>
      <Nodes><Node id="9223372036854775807" reactomeId="300" type="Chemical" x="0" y="0" width="1" height="1"/></Nodes>
    </Process>"#;
    let diagram = build(xml, &db, 100, LayoutMode::PathwayDiagram);
    assert_eq!(diagram.nodes[0].id, i64::MAX);
}
