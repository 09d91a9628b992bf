//! Submission and Jupyter URL exchange

use envreq_errors::Error;
use envreq_events::{
    AppEvent, EventEmitter, FailureContext, JupyterEvent, RequestEvent, SessionEvent,
};
use envreq_types::{EnvironmentRequestResult, JupyterAccess, SessionPhase};

use crate::notice::Notice;
use crate::session::SessionState;
use crate::types::SubmitReport;
use crate::OpsCtx;

/// Validate the form, create the request, and for the Jupyter IDE chain into
/// the URL exchange.
///
/// A failed exchange does not undo the created request: the session keeps
/// the new request id and the exchange error is returned.
///
/// # Errors
///
/// `ValidationError` without any network call when the name or purpose is
/// blank, otherwise the error of whichever call failed.
pub async fn submit(ctx: &OpsCtx, session: &mut SessionState) -> Result<SubmitReport, Error> {
    session.ensure_idle()?;

    if let Err(e) = session.form.validate() {
        ctx.emit(AppEvent::Request(RequestEvent::ValidationFailed {
            missing_fields: session
                .form
                .missing_required_fields()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }));
        let error = Error::from(e);
        session.set_notice(Notice::submit_failed(&error));
        session.advance(SessionPhase::Failed, ctx)?;
        return Err(error);
    }

    session.advance(SessionPhase::Submitting, ctx)?;
    session.set_jupyter(None);

    let payload = session.form.to_payload(ctx.requested_by());
    ctx.emit(AppEvent::Request(RequestEvent::SubmissionStarted {
        env_name: payload.env_name.clone(),
        instance_type: payload.instance_type,
        ide_option: payload.ide_option,
        frameworks: payload.framework_option.clone(),
        url: ctx.net.base_url().to_string(),
    }));

    let created = match envreq_net::submit_env_request(&ctx.net, &payload, &ctx.cancel, &ctx.tx)
        .await
    {
        Ok(created) => created,
        Err(e) => {
            ctx.emit(AppEvent::Request(RequestEvent::SubmissionFailed {
                env_name: payload.env_name.clone(),
                failure: FailureContext::from_error(&e),
            }));
            session.set_notice(Notice::submit_failed(&e));
            session.advance(SessionPhase::Failed, ctx)?;
            return Err(e);
        }
    };

    let request = EnvironmentRequestResult::submitted(created.request_id);
    session.set_request(request.clone());
    session.set_notice(Notice::request_created(&request.request_id));
    session.advance(SessionPhase::Submitted, ctx)?;
    ctx.emit(AppEvent::Request(RequestEvent::SubmissionCompleted {
        request_id: request.request_id.clone(),
        env_name: payload.env_name,
    }));

    let jupyter = if session.form.ide_option.is_jupyter() {
        Some(exchange(ctx, session, ctx.expiry_minutes(), true).await?)
    } else {
        None
    };

    Ok(SubmitReport {
        request,
        ide_option: session.form.ide_option,
        jupyter,
    })
}

/// Exchange the session's request id for a presigned Jupyter URL.
///
/// `expiry_minutes` defaults to the configured value.
///
/// # Errors
///
/// `ValidationError::MissingRequestId` when the session has no request,
/// otherwise the exchange error.
pub async fn fetch_jupyter_access(
    ctx: &OpsCtx,
    session: &mut SessionState,
    expiry_minutes: Option<u32>,
) -> Result<JupyterAccess, Error> {
    session.ensure_idle()?;
    exchange(
        ctx,
        session,
        expiry_minutes.unwrap_or_else(|| ctx.expiry_minutes()),
        false,
    )
    .await
}

/// Clear the form and every derived result. No network effect.
///
/// # Errors
///
/// Returns `SessionError::OperationInProgress` while a call is outstanding.
pub fn reset(ctx: &OpsCtx, session: &mut SessionState) -> Result<(), Error> {
    session.ensure_idle()?;
    let from = session.phase();
    session.clear();
    if from != SessionPhase::Idle {
        ctx.emit(AppEvent::Session(SessionEvent::PhaseChanged {
            from,
            to: SessionPhase::Idle,
            request_id: None,
        }));
    }
    ctx.emit(AppEvent::Session(SessionEvent::Reset));
    Ok(())
}

async fn exchange(
    ctx: &OpsCtx,
    session: &mut SessionState,
    expiry_minutes: u32,
    chained: bool,
) -> Result<JupyterAccess, Error> {
    let Some(request_id) = session
        .request_id()
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
    else {
        let error = Error::from(envreq_errors::ValidationError::MissingRequestId);
        session.set_notice(Notice::exchange_failed(&error));
        return Err(error);
    };

    session.advance(SessionPhase::ExchangingJupyter, ctx)?;
    ctx.emit(AppEvent::Jupyter(JupyterEvent::ExchangeStarted {
        request_id: request_id.clone(),
        expiry_minutes,
        chained,
    }));

    match envreq_net::generate_jupyter_url(
        &ctx.net,
        &request_id,
        expiry_minutes,
        &ctx.cancel,
        &ctx.tx,
    )
    .await
    {
        Ok(access) => {
            ctx.emit(AppEvent::Jupyter(JupyterEvent::UrlGenerated {
                request_id,
                expires_at: access.expires_at,
            }));
            session.set_jupyter(Some(access.clone()));
            session.set_notice(Notice::jupyter_ready());
            session.advance(SessionPhase::JupyterReady, ctx)?;
            Ok(access)
        }
        Err(e) => {
            ctx.emit(AppEvent::Jupyter(JupyterEvent::ExchangeFailed {
                request_id,
                failure: FailureContext::from_error(&e),
            }));
            session.set_notice(Notice::exchange_failed(&e));
            session.advance(SessionPhase::Failed, ctx)?;
            Err(e)
        }
    }
}
