//! Pipelines and programs.
//!
//! A [`Pipeline`] is an ordered list of stages; a [`Program`] is an ordered
//! list of pipelines. Program order does not fix execution order: the runner
//! schedules pipelines by their declared dependencies.

use common_display::{DisplayTree, TreeNode};
use common_error::{FlowError, FlowResult};

use crate::stage::Stage;

/// An ordered sequence of stages.
///
/// # Shape
///
/// A runnable pipeline satisfies:
///
/// 1. It has at least one stage.
/// 2. The first stage does not take input.
/// 3. Every later stage takes input.
/// 4. Every stage except the last produces output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Create a pipeline from stages without checking its shape.
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Results this pipeline waits for (declared by its first stage).
    pub fn requires(&self) -> Vec<String> {
        self.stages.first().map(Stage::requires).unwrap_or_default()
    }

    /// Name this pipeline publishes its result under (declared by its last stage).
    pub fn produces(&self) -> Option<&str> {
        self.stages.last().and_then(Stage::produces)
    }

    /// Verify the pipeline shape.
    pub fn check_shape(&self) -> FlowResult<()> {
        let Some((first, rest)) = self.stages.split_first() else {
            return Err(FlowError::shape("pipeline must have at least one stage"));
        };
        if first.input() {
            return Err(FlowError::shape(format!(
                "first stage of pipeline cannot require input (found '{}')",
                first.name()
            )));
        }
        if let Some(stage) = rest.iter().find(|s| !s.input()) {
            return Err(FlowError::shape(format!(
                "all stages of pipeline after the first must take input (found '{}')",
                stage.name()
            )));
        }
        let body = &self.stages[..self.stages.len() - 1];
        if let Some(stage) = body.iter().find(|s| !s.output()) {
            return Err(FlowError::shape(format!(
                "all stages of pipeline except the last must produce output (found '{}')",
                stage.name()
            )));
        }
        Ok(())
    }
}

impl From<Vec<Stage>> for Pipeline {
    fn from(stages: Vec<Stage>) -> Self {
        Self::new(stages)
    }
}

impl<'a> IntoIterator for &'a Pipeline {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}

/// Builder for constructing pipelines fluently from stage builders.
///
/// The first builder error is kept and returned by [`PipelineBuilder::build`].
#[derive(Debug)]
pub struct PipelineBuilder {
    stages: FlowResult<Vec<Stage>>,
}

impl PipelineBuilder {
    /// Start building from a first stage.
    pub fn start(stage: FlowResult<Stage>) -> Self {
        Self {
            stages: stage.map(|s| vec![s]),
        }
    }

    /// Append a stage.
    pub fn then(self, stage: FlowResult<Stage>) -> Self {
        let stages = self.stages.and_then(|mut stages| {
            stages.push(stage?);
            Ok(stages)
        });
        Self { stages }
    }

    /// Finish the pipeline.
    pub fn build(self) -> FlowResult<Pipeline> {
        self.stages.map(Pipeline::new)
    }
}

/// An ordered collection of pipelines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pipelines: Vec<Pipeline>,
}

impl Program {
    /// Create a program from pipelines.
    pub fn new(pipelines: Vec<Pipeline>) -> Self {
        Self { pipelines }
    }

    /// Pipelines in program order.
    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    /// Number of pipelines.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Check if the program has no pipelines.
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Count the stages across all pipelines.
    pub fn stage_count(&self) -> usize {
        self.pipelines.iter().map(Pipeline::len).sum()
    }

    /// Generate a tree-formatted description of the program.
    pub fn explain(&self) -> String {
        let root = ExplainNode {
            label: "program".to_string(),
            details: None,
            children: self
                .pipelines
                .iter()
                .enumerate()
                .map(|(i, p)| ExplainNode::pipeline(i, p))
                .collect(),
        };
        DisplayTree::new(&root).to_string()
    }
}

impl From<Vec<Pipeline>> for Program {
    fn from(pipelines: Vec<Pipeline>) -> Self {
        Self::new(pipelines)
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.explain())
    }
}

struct ExplainNode {
    label: String,
    details: Option<String>,
    children: Vec<ExplainNode>,
}

impl ExplainNode {
    fn pipeline(index: usize, pipeline: &Pipeline) -> Self {
        let mut notes = Vec::new();
        let requires = pipeline.requires();
        if !requires.is_empty() {
            notes.push(format!("requires {}", requires.join(", ")));
        }
        if let Some(name) = pipeline.produces() {
            notes.push(format!("produces {name}"));
        }
        Self {
            label: format!("pipeline {index}"),
            details: (!notes.is_empty()).then(|| notes.join("; ")),
            children: pipeline
                .stages()
                .iter()
                .map(|stage| Self {
                    label: stage.pretty(),
                    details: None,
                    children: Vec::new(),
                })
                .collect(),
        }
    }
}

impl TreeNode for ExplainNode {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        self.children.iter().map(|c| c as &dyn TreeNode).collect()
    }

    fn details(&self) -> Option<String> {
        self.details.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{pipe, plot};

    fn read_notify(path: &str, label: &str) -> Pipeline {
        PipelineBuilder::start(pipe::read(path))
            .then(pipe::notify(label))
            .build()
            .unwrap()
    }

    #[test]
    fn test_shape_accepts_valid_pipeline() {
        let pipeline = read_notify("colors.csv", "alpha");
        assert!(pipeline.check_shape().is_ok());
        assert_eq!(pipeline.produces(), Some("alpha"));
        assert!(pipeline.requires().is_empty());
    }

    #[test]
    fn test_shape_rejects_empty_pipeline() {
        let err = Pipeline::default().check_shape().unwrap_err();
        assert!(matches!(err, FlowError::ShapeError(_)));
    }

    #[test]
    fn test_shape_rejects_input_first() {
        let pipeline = Pipeline::new(vec![pipe::notify("alpha").unwrap()]);
        assert!(pipeline.check_shape().is_err());
    }

    #[test]
    fn test_shape_rejects_later_stage_without_input() {
        let pipeline = Pipeline::new(vec![
            pipe::read("colors.csv").unwrap(),
            pipe::read("colors.csv").unwrap(),
        ]);
        assert!(pipeline.check_shape().is_err());
    }

    #[test]
    fn test_shape_rejects_output_free_middle() {
        let pipeline = Pipeline::new(vec![
            pipe::read("colors.csv").unwrap(),
            plot::dot("red").unwrap(),
            pipe::notify("alpha").unwrap(),
        ]);
        let err = pipeline.check_shape().unwrap_err();
        assert!(err.to_string().contains("must produce output"));
    }

    #[test]
    fn test_builder_keeps_first_error() {
        let result = PipelineBuilder::start(pipe::read("colors.csv"))
            .then(pipe::notify(""))
            .then(pipe::sort(["red"], false))
            .build();
        assert!(matches!(result, Err(FlowError::InvalidParameter(_))));
    }

    #[test]
    fn test_explain() {
        let join = PipelineBuilder::start(pipe::join("alpha", "red", "beta", "green"))
            .build()
            .unwrap();
        let program = Program::new(vec![read_notify("colors.csv", "alpha"), join]);
        let expected = "program\n\
                        ├─ pipeline 0 (produces alpha)\n\
                        │  ├─ read: {\"path\":\"colors.csv\"}\n\
                        │  └─ notify: {\"label\":\"alpha\"}\n\
                        └─ pipeline 1 (requires alpha, beta)\n   \
                        └─ join: {\"leftCol\":\"red\",\"leftName\":\"alpha\",\"rightCol\":\"green\",\"rightName\":\"beta\"}\n";
        assert_eq!(program.explain(), expected);
        assert_eq!(program.stage_count(), 3);
    }
}
