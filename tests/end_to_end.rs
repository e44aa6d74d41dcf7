mod common;

use common::TempRepo;
use llm_changelog::{
   Args, ChangelogConfig, ChangelogError, GitCli, History, Range, RevisionRef, ScriptedPrompter,
   pipeline,
};
use serde_json::{Value, json};
use wiremock::{
   Mock, MockServer, ResponseTemplate,
   matchers::{method, path},
};

const CHANGELOG: &str = "# Release 1.1.0\n\n## What's new\n- Added a.txt\n\n## Impact\n- \
                         None\n\n## Changes\n- Added a.txt\n";

fn tagged_repo() -> TempRepo {
   let repo = TempRepo::init();
   repo.commit_file("README.md", "# demo\n", "chore: initial commit");
   repo.tag("v1.0.0");
   repo.commit_file("a.txt", "hello\n", "feat: add a.txt");
   repo.tag("v1.1.0");
   repo
}

#[tokio::test]
async fn test_tag_strategy_end_to_end() {
   let server = MockServer::start().await;
   Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
         "choices": [{ "message": { "role": "assistant", "content": CHANGELOG } }]
      })))
      .expect(1)
      .mount(&server)
      .await;

   let uri = server.uri();
   let (repo, output, expected_history, asked) = tokio::task::spawn_blocking(move || {
      let repo = tagged_repo();
      let config = ChangelogConfig {
         api_base_url: uri,
         api_key: Some("sk-test".to_string()),
         ..Default::default()
      };
      let args = Args {
         dir: repo.path().display().to_string(),
         no_serve: true,
         ..Default::default()
      };
      let mut prompter = ScriptedPrompter::new(["Between two tags", "v1.0.0", "v1.1.0"]);
      let output = pipeline::run(&args, &config, &mut prompter).unwrap();

      let git = GitCli::discover(repo.path()).unwrap();
      let range = Range::new(RevisionRef::new("v1.0.0"), RevisionRef::new("v1.1.0")).unwrap();
      let history = git.diff_summary(&range).unwrap();
      (repo, output, history, prompter.asked)
   })
   .await
   .unwrap();

   assert_eq!(asked, vec!["Generate changelog", "Older tag (from)", "Newer tag (to)"]);
   assert!(expected_history.as_str().contains("A\ta.txt"));

   let requests = server.received_requests().await.unwrap();
   let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
   let prompt = body["messages"][0]["content"].as_str().unwrap();
   assert!(prompt.ends_with(expected_history.as_str()));

   let root = repo.path().canonicalize().unwrap();
   let written = std::fs::read_to_string(root.join("CHANGELOG.generated.md")).unwrap();
   assert_eq!(written, CHANGELOG);
   assert_eq!(std::fs::read_to_string(root.join("docs/README.md")).unwrap(), CHANGELOG);
   assert!(root.join("docs/index.html").exists());
   assert!(output.index_created);
}

#[tokio::test]
async fn test_service_error_leaves_no_output() {
   let server = MockServer::start().await;
   Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
      .mount(&server)
      .await;

   let uri = server.uri();
   let (repo, err) = tokio::task::spawn_blocking(move || {
      let repo = tagged_repo();
      let config = ChangelogConfig {
         api_base_url: uri,
         api_key: Some("sk-test".to_string()),
         ..Default::default()
      };
      let args = Args {
         dir: repo.path().display().to_string(),
         no_serve: true,
         ..Default::default()
      };
      let mut prompter = ScriptedPrompter::new(["Between two tags", "v1.0.0", "v1.1.0"]);
      let err = pipeline::run(&args, &config, &mut prompter).unwrap_err();
      (repo, err)
   })
   .await
   .unwrap();

   assert!(matches!(err, ChangelogError::CompletionServiceError { status: 500, .. }));
   assert!(err.is_fatal());
   assert!(!repo.path().join("CHANGELOG.generated.md").exists());
}

#[tokio::test]
async fn test_missing_server_does_not_fail_the_run() {
   let server = MockServer::start().await;
   Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
         "choices": [{ "message": { "role": "assistant", "content": CHANGELOG } }]
      })))
      .mount(&server)
      .await;

   let uri = server.uri();
   let (repo, result) = tokio::task::spawn_blocking(move || {
      let repo = tagged_repo();
      let config = ChangelogConfig {
         api_base_url: uri,
         api_key: Some("sk-test".to_string()),
         server_program: Some(repo.path().join("no-such-docsify").display().to_string()),
         ..Default::default()
      };
      let args = Args { dir: repo.path().display().to_string(), ..Default::default() };
      let mut prompter = ScriptedPrompter::new(["Between two tags", "v1.0.0", "v1.1.0"]);
      let result = pipeline::run(&args, &config, &mut prompter);
      (repo, result)
   })
   .await
   .unwrap();

   let output = result.unwrap();
   assert!(output.changelog_path.exists());
   assert!(repo.path().join("docs/README.md").exists());
}

#[test]
fn test_outside_repository() {
   let dir = tempfile::tempdir().unwrap();
   let args = Args { dir: dir.path().display().to_string(), no_serve: true, ..Default::default() };
   let mut prompter = ScriptedPrompter::default();

   let err = pipeline::run(&args, &ChangelogConfig::default(), &mut prompter).unwrap_err();
   assert!(matches!(err, ChangelogError::NotAVersionControlRepository(_)));
   assert!(prompter.asked.is_empty());
}
