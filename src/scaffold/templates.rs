//! Handlebars templates for a new action project.

pub const ACTION_YML: &str = r#"name: {{title_yaml}}
description: {{description_yaml}}

inputs:
  who-to-greet:
    description: Who to greet
    required: false
    default: World

outputs:
  greeting:
    description: The greeting that was logged

runs:
  using: {{runtime}}
  main: dist/main.js

branding:
  icon: package
  color: blue
"#;

pub const PACKAGE_JSON: &str = r#"{
  "name": "{{package_name}}",
  "version": "0.1.0",
  "private": true,
  "type": "module",
  "scripts": {
    "build": "{{bin}} build",
    "validate": "{{bin}} validate",
    "typecheck": "tsc --noEmit"
  },
  "dependencies": {
    "@actions/core": "^1.11.1"
  },
  "devDependencies": {
    "@types/node": "^24.0.0",
    "esbuild": "^0.25.0",
    "typescript": "^5.9.0"
  }
}
"#;

pub const TSCONFIG_JSON: &str = r#"{
  "compilerOptions": {
    "target": "{{target}}",
    "module": "nodenext",
    "moduleResolution": "nodenext",
    "strict": true,
    "esModuleInterop": true,
    "skipLibCheck": true,
    "noEmit": true,
    "types": ["node"]
  },
  "include": ["src"]
}
"#;

pub const MAIN_TS: &str = r#"import * as core from '@actions/core';

async function run(): Promise<void> {
  const who = core.getInput('who-to-greet') || 'World';
  const greeting = `Hello, ${who}!`;
  core.info(greeting);
  core.setOutput('greeting', greeting);
}

run().catch((error: unknown) => {
  core.setFailed(error instanceof Error ? error.message : String(error));
});
"#;

pub const ACTION_CONFIG_JSON: &str = r#"{
  "build": {
    "minify": true,
    "target": "{{target}}",
    "sourceMap": false
  },
  "validation": {
    "requireActionYml": true,
    "maxBundleSize": "5mb"
  }
}
"#;

pub const GITIGNORE: &str = "node_modules/\n*.log\n.DS_Store\n";

/// Output path (relative to the project) and template source, in write order.
pub const PROJECT_FILES: &[(&str, &str)] = &[
    ("action.yml", ACTION_YML),
    ("package.json", PACKAGE_JSON),
    ("tsconfig.json", TSCONFIG_JSON),
    ("src/main.ts", MAIN_TS),
    ("action.config.json", ACTION_CONFIG_JSON),
    (".gitignore", GITIGNORE),
];
