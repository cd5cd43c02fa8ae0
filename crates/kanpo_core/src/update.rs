use crate::state::Awaiting;
use crate::{Effect, Msg, Phase, RunState};

/// Pure update function: applies a message to the run state and returns the
/// effects the engine must execute next. Messages that do not answer the
/// currently pending effect are ignored.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if state.phase() == Phase::Init && state.awaiting() == Awaiting::Nothing {
                state.expect_index();
                vec![Effect::FetchIndex]
            } else {
                Vec::new()
            }
        }
        Msg::IndexLoaded(links) => {
            if state.awaiting() != Awaiting::Index {
                return (state, Vec::new());
            }
            if links.is_empty() {
                state.finish(Phase::NoLinks);
                Vec::new()
            } else {
                state.set_links(links);
                request_page(&mut state, 0)
            }
        }
        Msg::IndexUnavailable { .. } => {
            if state.awaiting() == Awaiting::Index {
                state.finish(Phase::NoIndex);
            }
            Vec::new()
        }
        Msg::PageLoaded { link, documents } => {
            if state.awaiting() != Awaiting::Page(link) {
                return (state, Vec::new());
            }
            state.queue_documents(documents);
            advance(&mut state)
        }
        Msg::PageUnavailable { link, .. } => {
            if state.awaiting() != Awaiting::Page(link) {
                return (state, Vec::new());
            }
            advance(&mut state)
        }
        Msg::DocumentHandled(result) => {
            let answers_in_flight = state.awaiting() == Awaiting::Document
                && state
                    .in_flight()
                    .is_some_and(|doc| doc.url == result.descriptor.url);
            if !answers_in_flight {
                return (state, Vec::new());
            }
            state.record(result);
            advance(&mut state)
        }
        Msg::ManifestWritten(path) => {
            if state.awaiting() == Awaiting::Manifest {
                state.set_manifest_path(path);
                state.finish(Phase::ManifestWritten);
            }
            Vec::new()
        }
        Msg::ManifestFailed { .. } => {
            if state.awaiting() == Awaiting::Manifest {
                state.finish(Phase::ManifestFailed);
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn request_page(state: &mut RunState, link: usize) -> Vec<Effect> {
    match state.request_page(link) {
        Some((link, url)) => vec![Effect::FetchPage { link, url }],
        None => finish_links(state),
    }
}

/// Move to the next document, the next link, or the end of the run.
fn advance(state: &mut RunState) -> Vec<Effect> {
    if let Some(document) = state.next_document() {
        return vec![Effect::HandleDocument(document)];
    }
    state.mark_link_done();
    let next = state.current_link() + 1;
    if next < state.links().len() {
        request_page(state, next)
    } else {
        finish_links(state)
    }
}

fn finish_links(state: &mut RunState) -> Vec<Effect> {
    if state.completed().is_empty() {
        state.finish(Phase::NoDocuments);
        Vec::new()
    } else {
        state.expect_manifest();
        vec![Effect::WriteManifest(state.completed().to_vec())]
    }
}
