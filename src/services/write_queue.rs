//! Cola de escrituras por registro
//!
//! Cada id de solicitud tiene un carril FIFO atendido por una tarea tokio. Los
//! autoguardados de campo, los guardados completos y los borrados de un mismo
//! registro se ejecutan en el orden en que se encolaron, así que un guardado
//! nunca adelanta a un autoguardado anterior. Registros distintos avanzan en
//! paralelo.
//!
//! Cada trabajo lleva un sello monótono (`stamp`) que aparece en los logs y en
//! el resultado reportado.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};

use crate::clients::GearGuardApi;
use crate::dto::{FieldUpdate, SaveRequestPayload};
use crate::models::{RequestField, RequestId};
use crate::utils::errors::{ClientError, ClientResult};

/// Resultado de un autoguardado de campo
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    pub stamp: u64,
    /// Época de la sesión del editor que encoló la escritura
    pub session: u64,
    pub id: RequestId,
    pub field: RequestField,
    pub result: ClientResult<()>,
}

enum WriteJob {
    Field {
        stamp: u64,
        session: u64,
        update: FieldUpdate,
    },
    Save {
        stamp: u64,
        payload: SaveRequestPayload,
        reply: oneshot::Sender<ClientResult<Option<RequestId>>>,
    },
    Delete {
        stamp: u64,
        id: RequestId,
        reply: oneshot::Sender<ClientResult<()>>,
    },
    Flush {
        reply: oneshot::Sender<()>,
    },
}

type Lane = mpsc::UnboundedSender<WriteJob>;
type Lanes = Arc<Mutex<HashMap<RequestId, Lane>>>;

/// Cola de escrituras serializada por id de registro
pub struct WriteQueue {
    api: Arc<dyn GearGuardApi>,
    lanes: Lanes,
    next_stamp: AtomicU64,
    outcomes: mpsc::UnboundedSender<WriteOutcome>,
}

impl WriteQueue {
    /// Crea la cola y el receptor de resultados de autoguardado
    pub fn new(api: Arc<dyn GearGuardApi>) -> (Self, mpsc::UnboundedReceiver<WriteOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let queue = Self {
            api,
            lanes: Arc::new(Mutex::new(HashMap::new())),
            next_stamp: AtomicU64::new(0),
            outcomes,
        };
        (queue, receiver)
    }

    fn stamp(&self) -> u64 {
        self.next_stamp.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Carriles con trabajo pendiente. Un carril vacío se retira solo.
    pub fn active_lanes(&self) -> usize {
        self.lanes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Encola un trabajo en el carril del id, creando el carril si hace falta.
    /// Sin runtime tokio devuelve `NoRuntime`.
    fn push(&self, id: &RequestId, job: WriteJob) -> ClientResult<()> {
        let mut lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());

        let job = match lanes.get(id) {
            Some(lane) => match lane.send(job) {
                Ok(()) => return Ok(()),
                // El worker terminó: se recupera el trabajo y se abre un carril nuevo
                Err(mpsc::error::SendError(job)) => job,
            },
            None => job,
        };

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ClientError::NoRuntime)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        sender.send(job).map_err(|_| ClientError::QueueClosed)?;
        lanes.insert(id.clone(), sender);
        // El worker toma el primer trabajo cuando se suelta el lock
        runtime.spawn(run_lane(
            self.api.clone(),
            self.lanes.clone(),
            id.clone(),
            receiver,
            self.outcomes.clone(),
        ));
        Ok(())
    }

    /// Encola un autoguardado de campo sin esperar a la red. Devuelve el sello.
    pub fn enqueue_field(&self, session: u64, update: FieldUpdate) -> ClientResult<u64> {
        let stamp = self.stamp();
        tracing::debug!(
            "📝 Encolando autoguardado #{} {}.{}",
            stamp,
            update.id,
            update.field
        );
        let id = update.id.clone();
        self.push(&id, WriteJob::Field { stamp, session, update })?;
        Ok(stamp)
    }

    /// Guardado completo. Con id pasa por el carril (espera a las escrituras
    /// previas); sin id no hay carril posible y va directo a la API.
    pub async fn save(&self, payload: SaveRequestPayload) -> ClientResult<Option<RequestId>> {
        let stamp = self.stamp();
        let Some(id) = payload.request_id.clone() else {
            tracing::debug!("💾 Guardado #{} de borrador nuevo", stamp);
            return self.api.save_request(&payload).await;
        };

        let (reply, response) = oneshot::channel();
        self.push(&id, WriteJob::Save { stamp, payload, reply })?;
        response.await.map_err(|_| ClientError::QueueClosed)?
    }

    /// Borrado, ordenado detrás de las escrituras pendientes del mismo id
    pub async fn delete(&self, id: &RequestId) -> ClientResult<()> {
        let stamp = self.stamp();
        let (reply, response) = oneshot::channel();
        self.push(id, WriteJob::Delete { stamp, id: id.clone(), reply })?;
        response.await.map_err(|_| ClientError::QueueClosed)?
    }

    /// Espera a que terminen todas las escrituras encoladas hasta ahora para el id
    pub async fn flush(&self, id: &RequestId) -> ClientResult<()> {
        let has_lane = self
            .lanes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(id);
        if !has_lane {
            return Ok(());
        }

        let (reply, done) = oneshot::channel();
        self.push(id, WriteJob::Flush { reply })?;
        done.await.map_err(|_| ClientError::QueueClosed)
    }
}

/// Respuesta retenida hasta decidir si el carril sigue vivo, para que quien
/// espera vea el carril ya retirado
enum Reply {
    Nothing,
    Save(oneshot::Sender<ClientResult<Option<RequestId>>>, ClientResult<Option<RequestId>>),
    Delete(oneshot::Sender<ClientResult<()>>, ClientResult<()>),
    Flush(oneshot::Sender<()>),
}

impl Reply {
    fn deliver(self) {
        // Quien esperaba puede haberse ido
        match self {
            Reply::Nothing => {}
            Reply::Save(reply, result) => {
                let _ = reply.send(result);
            }
            Reply::Delete(reply, result) => {
                let _ = reply.send(result);
            }
            Reply::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }
}

/// Siguiente trabajo del carril. Si no queda ninguno, el carril sale del mapa
/// bajo el mismo lock con el que `push` encola, así no se pierde nada.
fn next_job(lanes: &Lanes, id: &RequestId, jobs: &mut mpsc::UnboundedReceiver<WriteJob>) -> Option<WriteJob> {
    let mut lanes = lanes.lock().unwrap_or_else(|e| e.into_inner());
    match jobs.try_recv() {
        Ok(job) => Some(job),
        Err(_) => {
            lanes.remove(id);
            None
        }
    }
}

async fn run_lane(
    api: Arc<dyn GearGuardApi>,
    lanes: Lanes,
    id: RequestId,
    mut jobs: mpsc::UnboundedReceiver<WriteJob>,
    outcomes: mpsc::UnboundedSender<WriteOutcome>,
) {
    tracing::debug!("🛤️ Carril de escritura abierto para {}", id);

    let mut pending = Reply::Nothing;
    loop {
        let next = next_job(&lanes, &id, &mut jobs);
        pending.deliver();
        let Some(job) = next else { break };
        pending = run_job(api.as_ref(), &id, job, &outcomes).await;
    }

    tracing::debug!("🛤️ Carril de escritura cerrado para {}", id);
}

async fn run_job(
    api: &dyn GearGuardApi,
    id: &RequestId,
    job: WriteJob,
    outcomes: &mpsc::UnboundedSender<WriteOutcome>,
) -> Reply {
    match job {
        WriteJob::Field { stamp, session, update } => {
            let result = api.update_field(&update).await;
            match &result {
                Ok(()) => tracing::debug!("✅ Autoguardado #{} {}.{}", stamp, update.id, update.field),
                Err(e) => tracing::warn!(
                    "⚠️ Autoguardado #{} {}.{} falló: {}",
                    stamp,
                    update.id,
                    update.field,
                    e
                ),
            }
            // El receptor puede haber desaparecido con el editor
            let _ = outcomes.send(WriteOutcome {
                stamp,
                session,
                id: update.id,
                field: update.field,
                result,
            });
            Reply::Nothing
        }
        WriteJob::Save { stamp, payload, reply } => {
            let result = api.save_request(&payload).await;
            match &result {
                Ok(_) => tracing::info!("💾 Guardado #{} de {} completado", stamp, id),
                Err(e) => tracing::warn!("⚠️ Guardado #{} de {} falló: {}", stamp, id, e),
            }
            Reply::Save(reply, result)
        }
        WriteJob::Delete { stamp, id: target, reply } => {
            let result = api.delete_request(&target).await;
            match &result {
                Ok(()) => tracing::info!("🗑️ Borrado #{} de {} completado", stamp, target),
                Err(e) => tracing::warn!("⚠️ Borrado #{} de {} falló: {}", stamp, target, e),
            }
            Reply::Delete(reply, result)
        }
        WriteJob::Flush { reply } => Reply::Flush(reply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    use crate::dto::{LoginRequest, SignupRequest};
    use crate::models::{DashboardData, RequestRecord, SessionUser};

    /// API que solo cuenta autoguardados
    #[derive(Default)]
    struct CountingApi {
        updates: AtomicUsize,
    }

    #[async_trait]
    impl GearGuardApi for CountingApi {
        async fn login(&self, _request: &LoginRequest) -> ClientResult<SessionUser> {
            Err(ClientError::Authentication("unused".into()))
        }
        async fn signup(&self, _request: &SignupRequest) -> ClientResult<()> {
            Ok(())
        }
        async fn logout(&self) -> ClientResult<()> {
            Ok(())
        }
        async fn fetch_dashboard(&self) -> ClientResult<DashboardData> {
            Ok(DashboardData::default())
        }
        async fn fetch_request(&self, id: &RequestId) -> ClientResult<RequestRecord> {
            Err(ClientError::NotFound(id.to_string()))
        }
        async fn update_field(&self, _update: &FieldUpdate) -> ClientResult<()> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn save_request(&self, payload: &SaveRequestPayload) -> ClientResult<Option<RequestId>> {
            Ok(payload.request_id.clone())
        }
        async fn delete_request(&self, _id: &RequestId) -> ClientResult<()> {
            Ok(())
        }
    }

    fn update(id: &str) -> FieldUpdate {
        FieldUpdate {
            id: RequestId::new(id),
            field: RequestField::Notes,
            value: "checked".into(),
        }
    }

    #[tokio::test]
    async fn test_lanes_retire_after_flush() {
        let api = Arc::new(CountingApi::default());
        let (queue, _outcomes) = WriteQueue::new(api.clone());

        for n in 0..500 {
            let id = format!("req-{n}");
            queue.enqueue_field(1, update(&id)).unwrap();
            queue.flush(&RequestId::new(id)).await.unwrap();
        }

        assert_eq!(api.updates.load(Ordering::SeqCst), 500);
        assert_eq!(queue.active_lanes(), 0);
    }

    #[tokio::test]
    async fn test_lane_reopens_after_retiring() {
        let api = Arc::new(CountingApi::default());
        let (queue, mut outcomes) = WriteQueue::new(api.clone());
        let id = RequestId::new("req-1");

        queue.enqueue_field(1, update("req-1")).unwrap();
        queue.flush(&id).await.unwrap();
        assert_eq!(queue.active_lanes(), 0);

        queue.enqueue_field(1, update("req-1")).unwrap();
        let saved = queue
            .save(SaveRequestPayload {
                record: RequestRecord::default(),
                request_id: Some(id.clone()),
            })
            .await
            .unwrap();
        assert_eq!(saved, Some(id));
        assert_eq!(queue.active_lanes(), 0);

        let first = outcomes.recv().await.unwrap();
        let second = outcomes.recv().await.unwrap();
        assert!(first.stamp < second.stamp);
        assert_eq!(api.updates.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_enqueue_outside_runtime_is_error() {
        let (queue, _outcomes) = WriteQueue::new(Arc::new(CountingApi::default()));
        let err = queue.enqueue_field(1, update("req-1")).unwrap_err();
        assert_eq!(err, ClientError::NoRuntime);
        assert_eq!(queue.active_lanes(), 0);
    }
}
