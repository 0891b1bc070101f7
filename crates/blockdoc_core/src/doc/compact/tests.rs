use crate::doc::test_support::{children, scene_types};
use crate::doc::{Field, GraphBuilder, Link, LinkArrayRole, Value, compact_link_arrays};

fn holey_graph() -> crate::doc::Graph {
	let mut builder = GraphBuilder::new(scene_types());
	let mut root = children(&builder, &[-1, 1, -1, 2, -1]).to_vec();
	let props = vec![builder.child(-1, Some("NiProperty")).expect("declared"), builder.child(3, Some("NiProperty")).expect("declared")];
	root.extend(GraphBuilder::counted_links("Num Properties", "Properties", props));
	root.push(Field::new(
		"Skin",
		Value::Group(GraphBuilder::counted_links("Num Extra Data List", "Extra Data List", vec![Link::child(-1, None)]).into()),
	));
	builder.block("NiNode", root).expect("root");
	builder.block("NiTriShape", Vec::new()).expect("shape");
	builder.block("NiNode", Vec::new()).expect("node");
	builder.block("NiAlphaProperty", Vec::new()).expect("alpha");
	builder.build()
}

fn targets(graph: &crate::doc::Graph, array: &str) -> Vec<i32> {
	graph.blocks[0]
		.find(array)
		.and_then(Value::as_array)
		.expect("array present")
		.iter()
		.map(|item| item.as_link().expect("link").target)
		.collect()
}

#[test]
fn removes_sentinels_preserving_order_and_updates_counts() {
	let mut graph = holey_graph();
	let removed = compact_link_arrays(&mut graph, &LinkArrayRole::defaults());

	assert_eq!(removed, 5);
	assert_eq!(targets(&graph, "Children"), vec![1, 2]);
	assert_eq!(targets(&graph, "Properties"), vec![3]);
	assert!(targets(&graph, "Extra Data List").is_empty(), "nested group pair compacted");
	assert_eq!(graph.blocks[0].find("Num Children"), Some(&Value::Int(2)));
	assert_eq!(graph.blocks[0].find("Num Properties"), Some(&Value::Int(1)));
	assert_eq!(graph.blocks[0].find("Num Extra Data List"), Some(&Value::Int(0)));
}

#[test]
fn second_pass_is_a_no_op() {
	let mut graph = holey_graph();
	compact_link_arrays(&mut graph, &LinkArrayRole::defaults());
	let once = graph.clone();

	assert_eq!(compact_link_arrays(&mut graph, &LinkArrayRole::defaults()), 0);
	assert_eq!(graph, once);
}

#[test]
fn arrays_outside_the_roles_keep_their_holes() {
	let mut graph = holey_graph();
	compact_link_arrays(&mut graph, &[LinkArrayRole::new("Num Properties", "Properties")]);

	assert_eq!(targets(&graph, "Children"), vec![-1, 1, -1, 2, -1]);
	assert_eq!(targets(&graph, "Properties"), vec![3]);
}
