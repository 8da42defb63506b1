/// Starting point written by `mfc init`
pub const TEMPLATE: &str = r#"# Missing-file check task
task_id: TASK-001

# Projects whose scan coverage is checked
target_projects:
  - project_id: target-app
    project_name: Application under test
    connection:
      type: local
      build_info_file: target/build_info.json
      file_list_file: target/files.csv

# Reference file sets the targets should cover
baseline_projects:
  - project_id: baseline-core
    connection:
      type: local
      build_info_file: baseline/build_info.json
      file_list_file: baseline/files.json
  # - project_id: baseline-remote
  #   connection:
  #     type: api
  #     api_endpoint: https://scanner.example.com/api
  #     token: change-me
  #     project_key: CORE

# latest_success_commit_id | latest_success_version | specific_baseline_commit_id
# specific_baseline_version | latest_success | no_restriction
baseline_selector_strategy: latest_success
# baseline_selector_params:
#   baseline_project_id: baseline-core
#   target_project_id: target-app

# First match wins. kind: auto | glob | regex
shield_rules:
  - id: SHIELD-DOCS
    pattern: "docs/*"
    remark: Documentation is not scanned
    enabled: true

# source_pattern is matched at the start of the path
mapping_rules:
  - id: MAP-OLD-NEW
    source_pattern: "old/(.+)"
    target_pattern: "new/$1"
    remark: Module moved in 2.0
    enabled: true

path_prefixes:
  - project_id: baseline-core
    prefix: /srv/baseline
  - project_id: target-app
    prefix: "D:/work/app"

# 1 fetches projects one at a time
max_concurrency: 8
"#;
