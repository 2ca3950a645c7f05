use std::f64::consts::PI;
use std::fs::File;
use std::rc::Rc;

use graph_draw::core::types::{Point, Rect};
use graph_draw::graph::model::{
    Edge, EdgeCurveStyle, EdgeStyle, Graph, Vertex, VertexEffect, VertexLabelPosition, VertexShape,
};
use graph_draw::platform::renderer_cairo::{CairoTextMeasurer, RendererCairo};
use graph_draw::{DrawSettings, GraphDrawer};

struct Args {
    output: String,
    width: i32,
    height: i32,
    vertices: u32,
    settings_path: Option<String>,
    curve_style: Option<EdgeCurveStyle>,
}

fn parse_args() -> Args {
    let mut args = Args {
        output: "graph.png".to_string(),
        width: 800,
        height: 600,
        vertices: 8,
        settings_path: None,
        curve_style: None,
    };

    let argv: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--output" if i + 1 < argv.len() => {
                i += 1;
                args.output = argv[i].clone();
            }
            "--size" if i + 1 < argv.len() => {
                i += 1;
                if let Some((w, h)) = argv[i].split_once('x') {
                    args.width = w.parse().unwrap_or(args.width);
                    args.height = h.parse().unwrap_or(args.height);
                }
            }
            "--vertices" if i + 1 < argv.len() => {
                i += 1;
                args.vertices = argv[i].parse().unwrap_or(args.vertices);
            }
            "--settings" if i + 1 < argv.len() => {
                i += 1;
                args.settings_path = Some(argv[i].clone());
            }
            "--curve" if i + 1 < argv.len() => {
                i += 1;
                args.curve_style = match argv[i].as_str() {
                    "straight" => Some(EdgeCurveStyle::Straight),
                    "bezier" => Some(EdgeCurveStyle::Bezier),
                    "points" => Some(EdgeCurveStyle::CurveThroughIntermediatePoints),
                    _ => None,
                };
            }
            _ => {}
        }
        i += 1;
    }

    args
}

/// Vertices evenly spaced on a circle, each linked to the next, with a few
/// chords and one self-loop.
fn demo_graph(count: u32, width: f64, height: f64) -> Graph {
    let center = Point::new(width / 2.0, height / 2.0);
    let radius = width.min(height) * 0.35;
    let shapes = [
        VertexShape::Disk,
        VertexShape::Square,
        VertexShape::SolidDiamond,
        VertexShape::Triangle,
        VertexShape::Sphere,
        VertexShape::Label,
        VertexShape::SolidTaperedDiamond,
        VertexShape::SolidRoundedX,
    ];

    let mut graph = Graph::default();
    for i in 0..count {
        let angle = 2.0 * PI * i as f64 / count as f64;
        let mut vertex = Vertex::new(
            i,
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        );
        vertex.attributes.shape = Some(shapes[i as usize % shapes.len()]);
        vertex.attributes.radius = Some(8.0);
        vertex.attributes.label = Some(format!("vertex {i}"));
        if i % 3 == 0 {
            vertex.attributes.label_position = Some(VertexLabelPosition::BottomCenter);
        }
        if i == 1 {
            vertex.attributes.effect = Some(VertexEffect::DropShadow);
        }
        graph.vertices.push(vertex);
    }

    let mut next_edge = 0;
    for i in 0..count {
        let mut edge = Edge::new(next_edge, i, (i + 1) % count, true);
        edge.attributes.label = Some(format!("e{next_edge}"));
        if i % 2 == 1 {
            edge.attributes.style = Some(EdgeStyle::Dash);
        }
        let a = center;
        let b = Point::new(
            center.x + radius * 0.6 * (2.0 * PI * (i as f64 + 0.5) / count as f64).cos(),
            center.y + radius * 0.6 * (2.0 * PI * (i as f64 + 0.5) / count as f64).sin(),
        );
        edge.attributes.intermediate_points = Some(vec![(a + b) * 0.5]);
        graph.edges.push(edge);
        next_edge += 1;
    }
    if count > 3 {
        graph.edges.push(Edge::new(next_edge, 0, count / 2, false));
        next_edge += 1;
    }
    if count > 0 {
        graph.edges.push(Edge::new(next_edge, 0, 0, true));
    }
    graph
}

fn main() {
    env_logger::init();

    let args = parse_args();

    let settings = match &args.settings_path {
        Some(path) => match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| DrawSettings::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load settings {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => DrawSettings::new(),
    };

    let measurer = match CairoTextMeasurer::new() {
        Ok(m) => Rc::new(m),
        Err(e) => {
            eprintln!("Failed to create Cairo text measurer: {}", e);
            std::process::exit(1);
        }
    };
    let mut drawer = match GraphDrawer::from_settings(&settings, measurer) {
        Ok(drawer) => drawer,
        Err(e) => {
            eprintln!("Invalid settings: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(style) = args.curve_style {
        drawer.on_curve_style_changed(|style| log::info!("Edges now drawn as {:?}", style));
        drawer.set_curve_style(style);
    }

    let surface = match cairo::ImageSurface::create(cairo::Format::ARgb32, args.width, args.height) {
        Ok(surface) => surface,
        Err(e) => {
            eprintln!("Failed to create image surface: {}", e);
            std::process::exit(1);
        }
    };
    let cr = match cairo::Context::new(&surface) {
        Ok(cr) => cr,
        Err(e) => {
            eprintln!("Failed to create Cairo context: {}", e);
            std::process::exit(1);
        }
    };
    let mut renderer = RendererCairo::new(cr);

    let (w, h) = (args.width as f64, args.height as f64);
    let mut graph = demo_graph(args.vertices, w, h);
    let report = drawer.draw(&mut graph, Rect::new(0.0, 0.0, w, h), &mut renderer);
    for e in &report.errors {
        eprintln!("warning: {}", e);
    }
    println!(
        "Drew {} vertices and {} edges (background {})",
        report.vertices_drawn,
        report.edges_drawn,
        String::from(settings.background_color)
    );

    // Finish drawing before the surface is encoded
    drop(renderer);
    let written = File::create(&args.output)
        .map_err(|e| e.to_string())
        .and_then(|mut file| surface.write_to_png(&mut file).map_err(|e| e.to_string()));
    if let Err(e) = written {
        eprintln!("Failed to write {}: {}", args.output, e);
        std::process::exit(1);
    }
    println!("Wrote {}", args.output);
}
