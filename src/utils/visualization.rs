//! Visualization utilities for rrt_connect
//!
//! Provides a unified interface for plotting search trees, paths and
//! obstacles using gnuplot. Configurations are projected onto their first
//! two coordinates.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{Configuration, Path, PlanningError, PlanningResult, TreeRole, Visualizable};
use crate::models::BoxWorld;
use crate::path_planning::{DynamicDomain, SearchReport, Tree};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00AA00";
    pub const BLUE: &str = "#0000FF";
    pub const ORANGE: &str = "#FFA500";
    pub const GRAY: &str = "#808080";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const PATH: &str = RED;
    pub const START_TREE: &str = "#35C788";
    pub const GOAL_TREE: &str = "#5588DD";
    pub const DOMAIN: &str = ORANGE;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: colors::PATH.to_string(),
            line_width: 2.0,
            caption: "Path".to_string(),
        }
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

/// Plot element recorded until the figure is rendered
#[derive(Debug, Clone)]
enum Layer {
    Lines { x: Vec<f64>, y: Vec<f64>, style: PathStyle },
    Segments { segments: Vec<[(f64, f64); 2]>, style: PathStyle },
    Points { x: Vec<f64>, y: Vec<f64>, style: PointStyle },
}

/// Projection of a configuration onto the plot plane
pub fn project(q: &Configuration) -> (f64, f64) {
    let x = q.get(0).copied().unwrap_or(0.0);
    let y = q.get(1).copied().unwrap_or(0.0);
    (x, y)
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    layers: Vec<Layer>,
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_ratio: Option<f64>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            layers: Vec::new(),
            title: String::new(),
            x_label: "q[0]".to_string(),
            y_label: "q[1]".to_string(),
            x_range: None,
            y_range: None,
            aspect_ratio: Some(1.0),
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_label(&mut self, label: &str) -> &mut Self {
        self.x_label = label.to_string();
        self
    }

    pub fn set_y_label(&mut self, label: &str) -> &mut Self {
        self.y_label = label.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Fix both axes to the projected joint limits
    pub fn set_limits(&mut self, lower: &Configuration, upper: &Configuration) -> &mut Self {
        let (x0, y0) = project(lower);
        let (x1, y1) = project(upper);
        self.set_x_range(x0, x1).set_y_range(y0, y1)
    }

    /// Set aspect ratio (None for auto)
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> &mut Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Number of recorded plot elements
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn clear(&mut self) -> &mut Self {
        self.layers.clear();
        self
    }

    /// Draw anything that knows how to draw itself
    pub fn draw<T: Visualizable + ?Sized>(&mut self, item: &T) -> &mut Self {
        item.visualize(self);
        self
    }

    pub fn plot_path(&mut self, path: &Path, style: &PathStyle) -> &mut Self {
        let (x, y): (Vec<f64>, Vec<f64>) = path.iter().map(project).unzip();
        self.plot_path_xy(&x, &y, style)
    }

    pub fn plot_path_xy(&mut self, x: &[f64], y: &[f64], style: &PathStyle) -> &mut Self {
        if !x.is_empty() {
            self.layers.push(Layer::Lines {
                x: x.to_vec(),
                y: y.to_vec(),
                style: style.clone(),
            });
        }
        self
    }

    /// Disconnected line segments sharing one legend entry
    pub fn plot_segments(&mut self, segments: Vec<[(f64, f64); 2]>, style: &PathStyle) -> &mut Self {
        if !segments.is_empty() {
            self.layers.push(Layer::Segments {
                segments,
                style: style.clone(),
            });
        }
        self
    }

    /// Outline of the projected box `[min, max]`
    pub fn plot_rectangle(&mut self, min: &Configuration, max: &Configuration, style: &PathStyle) -> &mut Self {
        let (x0, y0) = project(min);
        let (x1, y1) = project(max);
        self.plot_path_xy(&[x0, x1, x1, x0, x0], &[y0, y0, y1, y1, y0], style)
    }

    pub fn plot_circle(&mut self, center: (f64, f64), radius: f64, style: &PathStyle) -> &mut Self {
        let (x, y): (Vec<f64>, Vec<f64>) = (0..=36)
            .map(|i| {
                let theta = i as f64 * std::f64::consts::TAU / 36.0;
                (center.0 + radius * theta.cos(), center.1 + radius * theta.sin())
            })
            .unzip();
        self.plot_path_xy(&x, &y, style)
    }

    pub fn plot_point(&mut self, q: &Configuration, style: &PointStyle) -> &mut Self {
        let (x, y) = project(q);
        self.plot_points_xy(&[x], &[y], style)
    }

    pub fn plot_points_xy(&mut self, x: &[f64], y: &[f64], style: &PointStyle) -> &mut Self {
        if !x.is_empty() {
            self.layers.push(Layer::Points {
                x: x.to_vec(),
                y: y.to_vec(),
                style: style.clone(),
            });
        }
        self
    }

    pub fn plot_start(&mut self, q: &Configuration) -> &mut Self {
        self.plot_point(q, &PointStyle::new(colors::START, "Start").with_size(1.5))
    }

    pub fn plot_goal(&mut self, q: &Configuration) -> &mut Self {
        self.plot_point(q, &PointStyle::new(colors::GOAL, "Goal").with_size(1.5))
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> PlanningResult<()> {
        self.render();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| PlanningError::Visualization(e.to_string()))
    }

    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> PlanningResult<()> {
        self.render();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| PlanningError::Visualization(e.to_string()))
    }

    pub fn save_svg(&mut self, path: &str) -> PlanningResult<()> {
        self.render();
        self.figure
            .save_to_svg(path, 800, 600)
            .map_err(|e| PlanningError::Visualization(e.to_string()))
    }

    fn render(&mut self) {
        self.figure.clear_axes();
        let axes = self.figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);
        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some(ratio) = self.aspect_ratio {
            axes.set_aspect_ratio(AutoOption::Fix(ratio));
        }

        for layer in &self.layers {
            match layer {
                Layer::Lines { x, y, style } => {
                    let mut options = vec![Color(style.color.as_str()), LineWidth(style.line_width)];
                    if !style.caption.is_empty() {
                        options.push(Caption(style.caption.as_str()));
                    }
                    axes.lines(x, y, &options);
                }
                Layer::Segments { segments, style } => {
                    for (i, [a, b]) in segments.iter().enumerate() {
                        let mut options = vec![Color(style.color.as_str()), LineWidth(style.line_width)];
                        if i == 0 && !style.caption.is_empty() {
                            options.push(Caption(style.caption.as_str()));
                        }
                        axes.lines([a.0, b.0], [a.1, b.1], &options);
                    }
                }
                Layer::Points { x, y, style } => {
                    let mut options = vec![
                        Color(style.color.as_str()),
                        PointSymbol(style.symbol),
                        PointSize(style.size),
                    ];
                    if !style.caption.is_empty() {
                        options.push(Caption(style.caption.as_str()));
                    }
                    axes.points(x, y, &options);
                }
            }
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visualizable for Tree {
    fn visualize(&self, vis: &mut Visualizer) {
        let (color, caption) = match self.role() {
            TreeRole::Start => (colors::START_TREE, "Start tree"),
            TreeRole::Goal => (colors::GOAL_TREE, "Goal tree"),
        };
        let segments = self
            .edges()
            .map(|(parent, child)| [project(self.configuration(parent)), project(self.configuration(child))])
            .collect();
        vis.plot_segments(segments, &PathStyle::new(color, caption).with_line_width(1.0));

        let (x, y): (Vec<f64>, Vec<f64>) = self.iter().map(|(_, q)| project(q)).unzip();
        vis.plot_points_xy(&x, &y, &PointStyle::new(color, "").with_size(0.3).with_symbol('.'));
    }
}

impl Visualizable for Path {
    fn visualize(&self, vis: &mut Visualizer) {
        vis.plot_path(self, &PathStyle::default());
    }
}

impl Visualizable for DynamicDomain {
    fn visualize(&self, vis: &mut Visualizer) {
        if let Some((min, max)) = self.bounds() {
            vis.plot_rectangle(min, max, &PathStyle::new(colors::DOMAIN, "Dynamic domain").with_line_width(1.0));
        }
    }
}

impl Visualizable for BoxWorld {
    fn visualize(&self, vis: &mut Visualizer) {
        let mut caption = "Obstacles";
        for obstacle in self.boxes() {
            vis.plot_rectangle(&obstacle.min, &obstacle.max, &PathStyle::new(colors::OBSTACLE, caption));
            caption = "";
        }
        for sphere in self.spheres() {
            vis.plot_circle(project(&sphere.center), sphere.radius, &PathStyle::new(colors::OBSTACLE, caption));
            caption = "";
        }
    }
}

impl Visualizable for SearchReport {
    fn visualize(&self, vis: &mut Visualizer) {
        vis.draw(self.tree(TreeRole::Start));
        vis.draw(self.tree(TreeRole::Goal));
        vis.draw(&self.dynamic_domain);
        if let Some(path) = self.path() {
            vis.draw(&path);
        }
        vis.plot_start(self.tree(TreeRole::Start).root_configuration());
        vis.plot_goal(self.tree(TreeRole::Goal).root_configuration());
    }
}
